use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::ocr::{OcrEngine, TesseractEngine, scan_image};
use crate::utils::pretty_table;

/// Scan a broker screenshot into trade-form fields. A hard OCR failure
/// tells the user to fall back to manual entry; a clean scan that simply
/// recognized nothing is reported as such, not as an error.
pub async fn run(
    image_path: Option<&Path>,
    tesseract: &str,
    lang: &str,
    json: bool,
    check: bool,
) -> Result<()> {
    let engine = TesseractEngine::new().with_binary(tesseract).with_language(lang);

    if check {
        engine.health_check().await.context("OCR engine is not available")?;
        println!("OCR engine is operational.");
        return Ok(());
    }

    let image_path = image_path.context("no screenshot provided")?;
    let bytes = std::fs::read(image_path)
        .with_context(|| format!("failed to read {}", image_path.display()))?;

    let result = match scan_image(&engine, &bytes).await {
        Ok(result) => result,
        Err(e) => {
            return Err(anyhow!(e).context("scan failed; please enter the trade manually"));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.metadata.fields_extracted == 0 {
        println!("No trade fields recognized in this screenshot.");
        println!("Raw OCR text ({} characters) follows:", result.metadata.ocr_text_length);
        println!("{}", result.extracted.raw_text);
        return Ok(());
    }

    let field = |name: &str, value: Option<String>| {
        vec![name.to_string(), value.unwrap_or_else(|| "-".to_string())]
    };
    let extracted = &result.extracted;
    let rows = vec![
        field("Symbol", extracted.symbol.clone()),
        field("Side", extracted.side.map(|s| s.as_str().to_string())),
        field("Entry price", extracted.entry_price.map(|p| p.to_string())),
        field("Exit price", extracted.exit_price.map(|p| p.to_string())),
        field("Quantity", extracted.quantity.map(|q| q.to_string())),
        field("Stop loss", extracted.stop_loss.map(|p| p.to_string())),
        field("Target", extracted.target.map(|p| p.to_string())),
        field("Timestamp", extracted.timestamp.clone()),
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    println!(
        "{} of 8 fields extracted from {} characters of OCR text.",
        result.metadata.fields_extracted, result.metadata.ocr_text_length
    );
    Ok(())
}
