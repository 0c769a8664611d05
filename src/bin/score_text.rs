use anyhow::Result;
use review_insights::models::SentimentCategory;
use review_insights::sentiment::{SentimentScorer, VaderScorer};

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        println!("usage: score_text <review text>");
        return Ok(());
    }

    let scorer = VaderScorer::new();
    let compound = scorer.score(&text)?;
    println!("compound:  {compound:.4}");
    println!("sentiment: {}", SentimentCategory::from_compound(compound));

    Ok(())
}
