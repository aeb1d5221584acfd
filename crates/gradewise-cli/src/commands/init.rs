//! The `gradewise init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create gradewise.toml
    if std::path::Path::new("gradewise.toml").exists() {
        println!("gradewise.toml already exists, skipping.");
    } else {
        std::fs::write("gradewise.toml", SAMPLE_CONFIG)?;
        println!("Created gradewise.toml");
    }

    // Create sample answer sheets
    std::fs::create_dir_all("samples")?;
    for (path, content) in [
        ("samples/model-answer.txt", SAMPLE_MODEL),
        ("samples/student-answer.txt", SAMPLE_STUDENT),
    ] {
        if std::path::Path::new(path).exists() {
            println!("{path} already exists, skipping.");
        } else {
            std::fs::write(path, content)?;
            println!("Created {path}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Run: gradewise inspect --file samples/model-answer.txt");
    println!("  2. Run: gradewise upload-model --name sample --file samples/model-answer.txt");
    println!("  3. Run: gradewise grade --name sample --student samples/student-answer.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradewise configuration

# Marks for questions without a "(N Marks)" annotation
default_marks_per_question = 10.0

# tfidf_cosine or word_overlap
scoring_strategy = "tfidf_cosine"

store_dir = "./gradewise-store"
# JSON reports written by `gradewise grade` (override with --output)
output_dir = "./gradewise-results"
parallelism = 4
"#;

const SAMPLE_MODEL: &str = "\
Q1(10 Marks) The sky is blue because air molecules scatter blue sunlight more than red light.
Q2(5 Marks) Water boils at 100 degrees Celsius at sea level.
Q3(5 Marks) Photosynthesis converts light energy, water and carbon dioxide into glucose and oxygen.
";

const SAMPLE_STUDENT: &str = "\
Q1 The sky looks blue since air scatters blue light from the sun.
Q3 Plants turn sunlight, water and carbon dioxide into glucose and release oxygen.
";
