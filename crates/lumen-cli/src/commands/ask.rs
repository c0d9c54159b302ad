//! Question commands (ask, chat)

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use lumen_core::{Analysis, LogEntry, Pipeline, PromptId, Submission};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{format_value, open_pipeline, parse_mode, truncate};

pub async fn cmd_ask(data: Option<&Path>, question: &str, mode: &str, json: bool) -> Result<()> {
    let prompt = parse_mode(mode)?;
    let pipeline = open_pipeline(data)?;

    match pipeline.submit_with(question, prompt).await {
        Submission::Completed(analysis) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!("{}", format_analysis(&analysis));
            }
            Ok(())
        }
        Submission::Empty => anyhow::bail!("Question must not be empty"),
        // Nothing else shares a one-shot pipeline
        Submission::Busy => anyhow::bail!("Another question is already in progress"),
    }
}

pub async fn cmd_chat(data: Option<&Path>, mode: &str) -> Result<()> {
    let prompt = parse_mode(mode)?;
    let pipeline = open_pipeline(data)?;

    println!("💬 Lumen interactive session ({} mode)", prompt);
    println!("   Type a question, 'history' to review, or 'exit' to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "exit" | "quit" => break,
            "history" => print_history(&pipeline.history().await),
            question => ask_in_session(&pipeline, question, prompt).await,
        }
    }

    println!("👋 Goodbye");
    Ok(())
}

async fn ask_in_session(pipeline: &Pipeline, question: &str, prompt: PromptId) {
    match pipeline.submit_with(question, prompt).await {
        Submission::Completed(analysis) => println!("{}\n", format_analysis(&analysis)),
        Submission::Empty => {}
        Submission::Busy => println!("⏳ Still working on the previous question"),
    }
}

fn print_history(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("   (no questions yet)");
        return;
    }
    for entry in entries {
        println!(
            "   [{}] {:<40} → {}",
            entry.asked_at.format("%H:%M:%S"),
            truncate(&entry.question, 40),
            truncate(&entry.result.summary, 60)
        );
    }
}

/// Render an analysis for the terminal
pub fn format_analysis(analysis: &Analysis) -> String {
    let mut lines = Vec::new();
    let category = analysis.category;

    lines.push(format!("📊 {} Analysis", category.label()));
    match &analysis.context {
        Some(context) => {
            lines.push(format!("   {}", context.summary));
            lines.extend(context.insights.iter().map(|i| format!("   • {}", i)));
        }
        None => lines.push("   (no data available for this category)".to_string()),
    }

    if let Some(forecast) = analysis.outlook.forecast {
        lines.push(format!(
            "   Next period forecast: {}",
            format_value(category, forecast)
        ));
    }
    for anomaly in &analysis.outlook.anomalies {
        lines.push(format!(
            "   ⚠️  Unusual value: {} ({})",
            anomaly.label,
            format_value(category, anomaly.value)
        ));
    }

    let narration = &analysis.narration;
    lines.push(String::new());
    if narration.is_fallback() {
        lines.push("🧠 Executive Summary (built-in, narration unavailable)".to_string());
    } else {
        lines.push("🧠 Executive Summary".to_string());
    }
    if !narration.summary.is_empty() {
        lines.push(format!("   {}", narration.summary));
    }

    push_list(&mut lines, "💡 Key Insights", &narration.insights);
    push_list(&mut lines, "🎯 Recommendations", &narration.recommendations);
    push_list(&mut lines, "📌 From the Data", &analysis.recommendations);

    if !narration.risks.is_empty() {
        lines.push(String::new());
        lines.push("⚠️  Risk Assessment".to_string());
        lines.push(format!("   {}", narration.risks));
    }
    if !narration.next_steps.is_empty() {
        lines.push(String::new());
        lines.push("➡️  Next Steps".to_string());
        lines.push(format!("   {}", narration.next_steps));
    }

    lines.join("\n")
}

fn push_list(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_string());
    lines.extend(items.iter().map(|i| format!("   • {}", i)));
}
