//! One-shot summarization from the command line.

use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::Pipeline;

pub async fn run_summarize(
    urls: &[String],
    model: Option<String>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    if let Some(model) = model {
        settings.summary.model = model;
    }

    let pipeline = Pipeline::new(&settings);

    let spinner = Output::spinner(&format!(
        "Fetching transcripts for {} video(s)...",
        urls.len()
    ));
    let result = pipeline.run(urls).await;
    spinner.finish_and_clear();

    match result {
        Ok(output) => {
            Output::header("Summary");
            println!();
            println!("{}", output.summary);
            println!();

            Output::header("Videos");
            for video in &output.videos {
                Output::video_item(&video.title, video.id.as_str());
            }

            if !output.skipped.is_empty() {
                println!();
                for skipped in &output.skipped {
                    Output::warning(&format!("Skipped {}: {}", skipped.url, skipped.reason));
                }
            }

            Ok(())
        }
        Err(failure) => {
            Output::error(&failure.error.to_string());
            for skipped in &failure.skipped {
                Output::warning(&format!("Skipped {}: {}", skipped.url, skipped.reason));
            }
            anyhow::bail!("summarization failed")
        }
    }
}
