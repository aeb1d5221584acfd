//! The `gradewise grade` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio::sync::Semaphore;

use gradewise_core::engine::Evaluator;
use gradewise_core::error::GradingError;
use gradewise_core::model::AnswerSet;
use gradewise_core::parser;
use gradewise_core::report::EvaluationReport;
use gradewise_core::traits::ModelAnswerRepository;
use gradewise_extract::{is_pdf, load_answer_document};
use gradewise_store::config::load_config_from;
use gradewise_store::FileModelStore;

/// One student sheet and its report.
#[derive(Debug, Serialize)]
struct GradedSheet {
    student: String,
    report: EvaluationReport,
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    name: Option<String>,
    student_path: PathBuf,
    model_path: Option<PathBuf>,
    strategy: Option<String>,
    default_marks: Option<f64>,
    format: String,
    output: Option<PathBuf>,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "markdown" | "md"),
        "unknown format '{format}' (expected text, json or markdown)"
    );

    let config = load_config_from(config_path.as_deref())?;

    let mut eval_config = config.evaluation_config()?;
    if let Some(s) = &strategy {
        eval_config.scoring_strategy = s.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if let Some(marks) = default_marks {
        eval_config.default_marks_per_question = marks;
    }
    let evaluator = Arc::new(Evaluator::new(eval_config)?);

    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    // Resolve the model answer
    let model: AnswerSet = match (&model_path, &name) {
        (Some(path), _) => {
            let document = load_answer_document(path).await?;
            parser::segment(&document.text)
        }
        (None, Some(name)) => {
            let store = FileModelStore::new(&config.store_dir);
            store
                .get_current_model(name)?
                .ok_or_else(|| GradingError::MissingModelAnswer { name: name.clone() })?
                .answers
        }
        (None, None) => anyhow::bail!("either --name or --model is required"),
    };
    if model.is_empty() {
        tracing::warn!("model answer has no question labels");
    }
    let model = Arc::new(model);

    let students = collect_student_sheets(&student_path)?;
    anyhow::ensure!(
        !students.is_empty(),
        "no answer sheets (.pdf or .txt) found in {}",
        student_path.display()
    );

    eprintln!(
        "gradewise v{} — Grading {} sheet(s) with {}",
        env!("CARGO_PKG_VERSION"),
        students.len(),
        evaluator.config().scoring_strategy
    );

    let semaphore = Arc::new(Semaphore::new(parallelism));
    let mut futures = FuturesUnordered::new();

    for path in students {
        let evaluator = Arc::clone(&evaluator);
        let model = Arc::clone(&model);
        let semaphore = Arc::clone(&semaphore);

        futures.push(async move {
            let outcome = async {
                let _permit = semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                let document = load_answer_document(&path).await?;
                let student = parser::segment(&document.text);
                anyhow::Ok(evaluator.evaluate(&model, &student))
            }
            .await;
            (path, outcome)
        });
    }

    let mut graded = Vec::new();
    let mut failed = 0usize;
    while let Some((path, outcome)) = futures.next().await {
        match outcome {
            Ok(report) => graded.push(GradedSheet {
                student: path.display().to_string(),
                report,
            }),
            Err(e) => {
                tracing::error!("grading failed for {}: {e:#}", path.display());
                eprintln!("  ERROR: {}: {e:#}", path.display());
                failed += 1;
            }
        }
    }
    graded.sort_by(|a, b| a.student.cmp(&b.student));

    print_results(&graded, &format)?;

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    save_reports(&graded, &output)?;

    if !model.is_empty() && failed > 0 {
        anyhow::bail!(
            "{failed} of {} answer sheet(s) could not be graded",
            graded.len() + failed
        );
    }
    if model.is_empty() {
        return Err(GradingError::NoModelQuestionsFound.into());
    }

    Ok(())
}

/// A single file, or every `.pdf`/`.txt` file directly inside a directory.
fn collect_student_sheets(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut sheets = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?
    {
        let p = entry?.path();
        if p.is_file() && (is_pdf(&p) || is_text(&p)) {
            sheets.push(p);
        } else {
            tracing::debug!("skipping {}", p.display());
        }
    }
    sheets.sort();
    Ok(sheets)
}

fn is_text(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

fn print_results(graded: &[GradedSheet], format: &str) -> Result<()> {
    match format {
        "json" => {
            let json = match graded {
                [single] => serde_json::to_string_pretty(&single.report)?,
                _ => serde_json::to_string_pretty(graded)?,
            };
            println!("{json}");
        }
        "markdown" | "md" => {
            for sheet in graded {
                if graded.len() > 1 {
                    println!("## {}\n", sheet.student);
                }
                println!("{}", sheet.report.to_markdown());
            }
        }
        _ => match graded {
            [single] => print_question_table(single),
            _ => print_summary(graded),
        },
    }
    Ok(())
}

fn print_question_table(sheet: &GradedSheet) {
    use comfy_table::{Cell, Table};

    let report = &sheet.report;
    let mut table = Table::new();
    table.set_header(vec!["Question", "Score", "Max", "Answered"]);

    for q in &report.per_question {
        table.add_row(vec![
            Cell::new(&q.key),
            Cell::new(format!("{:.2}", q.score)),
            Cell::new(format!("{:.2}", q.max_marks)),
            Cell::new(if q.answered { "yes" } else { "no" }),
        ]);
    }

    println!("{}\n", sheet.student);
    println!("{table}");
    println!(
        "Total: {:.2} / {:.2} ({:.2}%)  Grade: {}",
        report.total_score, report.total_possible, report.percentage, report.grade
    );
}

fn print_summary(graded: &[GradedSheet]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Student", "Score", "Possible", "Percent", "Grade", "Answered",
    ]);

    for sheet in graded {
        let r = &sheet.report;
        table.add_row(vec![
            Cell::new(&sheet.student),
            Cell::new(format!("{:.2}", r.total_score)),
            Cell::new(format!("{:.2}", r.total_possible)),
            Cell::new(format!("{:.2}%", r.percentage)),
            Cell::new(r.grade),
            Cell::new(format!("{}/{}", r.answered_count(), r.per_question.len())),
        ]);
    }

    println!("{table}");
}

fn save_reports(graded: &[GradedSheet], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for sheet in graded {
        let stem = Path::new(&sheet.student)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let mut path = dir.join(format!("{stem}-{timestamp}.json"));
        let mut n = 1;
        while path.exists() {
            n += 1;
            path = dir.join(format!("{stem}-{timestamp}-{n}.json"));
        }
        sheet.report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }
    Ok(())
}
