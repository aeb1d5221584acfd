pub mod grade;
pub mod init;
pub mod inspect;
pub mod list_models;
pub mod upload_model;
