//! CLI tool to convert editor script JSON to Automerge binary format.
//!
//! Usage:
//!   script2automerge --input script.json [--output script.automerge]
//!       [--outline-output script.outline.automerge] [--validate] [--stats]

mod input;
mod transform;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use input::InputScript;
use slugline::outline::OutlineManager;
use slugline::screenplay::{classify::normalize, DEFAULT_LINES_PER_PAGE};
use slugline::{ElementType, ScriptManager};

#[derive(Parser, Debug)]
#[command(
    name = "script2automerge",
    about = "Convert editor script JSON to Automerge binary format",
    version
)]
struct Args {
    /// Input JSON file path (editor export)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (defaults to input path with .automerge extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Outline output path (defaults to input path with .outline.automerge
    /// extension; only written when the export carries a structure section)
    #[arg(long)]
    outline_output: Option<PathBuf>,

    /// Validate output by hydrating back to structs
    #[arg(long, default_value = "false")]
    validate: bool,

    /// Print statistics about the conversion
    #[arg(long, default_value = "false")]
    stats: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Validate input exists
    let input_path = &args.input;
    if !input_path.exists() {
        anyhow::bail!("Input file does not exist: {}", input_path.display());
    }

    // 2. Read JSON file
    let json_content =
        std::fs::read_to_string(input_path).context("Failed to read input file")?;

    // 3. Parse JSON to input structs
    let parsed: InputScript =
        serde_json::from_str(&json_content).context("Failed to parse JSON")?;

    // Store some stats before transformation
    let num_elements = parsed.content.elements.len();
    let num_acts = parsed.structure.as_ref().map(|s| s.acts.len()).unwrap_or(0);
    let total_beats: usize = parsed
        .structure
        .as_ref()
        .map(|s| s.acts.iter().map(|a| a.beats.len()).sum())
        .unwrap_or(0);

    // 4. Transform to Rust models
    let InputScript {
        id,
        title,
        content,
        structure,
    } = parsed;
    let root = transform::build_script_root(&id, &title, content);

    // 5. Create Automerge document
    let mut manager = ScriptManager::new();
    manager
        .update_state(|state| {
            *state = root;
        })
        .context("Failed to update Automerge document state")?;

    // 6. Save to binary
    let binary = manager.save();

    // 7. Determine output path
    let output_path = args.output.unwrap_or_else(|| {
        let mut path = input_path.clone();
        path.set_extension("automerge");
        path
    });

    // 8. Write output
    std::fs::write(&output_path, &binary).context("Failed to write output file")?;

    // 9. Outline document, when the export carries one
    let mut outline_path: Option<PathBuf> = None;
    if let Some(structure) = structure {
        let outline_root = transform::build_outline_root(&id, &title, structure);
        let mut outline_manager = OutlineManager::new();
        outline_manager
            .update_state(|state| {
                *state = outline_root;
            })
            .context("Failed to update outline document state")?;
        let outline_binary = outline_manager.save();

        let path = args.outline_output.clone().unwrap_or_else(|| {
            let mut path = input_path.clone();
            path.set_extension("outline.automerge");
            path
        });
        std::fs::write(&path, &outline_binary).context("Failed to write outline output file")?;
        outline_path = Some(path);
    }

    // 10. Optional validation
    if args.validate {
        let mut loaded =
            ScriptManager::from_bytes(&binary).context("Failed to load binary for validation")?;
        let hydrated = loaded
            .get_state()
            .context("Failed to hydrate for validation")?;

        // Basic validation - check key counts match
        if hydrated.len() != num_elements {
            anyhow::bail!(
                "Validation failed: element count mismatch (expected {}, got {})",
                num_elements,
                hydrated.len()
            );
        }
        if hydrated.element_order.len() != num_elements {
            anyhow::bail!(
                "Validation failed: order length mismatch (expected {}, got {})",
                num_elements,
                hydrated.element_order.len()
            );
        }

        // Every stored text must already be in normal form
        for element in hydrated.sequence() {
            let normalized = normalize(element.element_type, &element.text);
            if normalized != element.text {
                anyhow::bail!(
                    "Validation failed: element {} text not normalized ({:?} vs {:?})",
                    element.id,
                    element.text,
                    normalized
                );
            }
        }

        println!("✓ Validation passed!");
    }

    // 11. Optional stats
    if args.stats {
        let pages = manager
            .paginate(DEFAULT_LINES_PER_PAGE)
            .context("Failed to paginate for stats")?;

        println!();
        println!("Conversion statistics:");
        println!("  Script ID: {}", id);
        println!("  Title: {}", title);
        println!();
        println!("  Input JSON:    {:>10} bytes", json_content.len());
        println!("  Output binary: {:>10} bytes", binary.len());
        println!(
            "  Compression:   {:>10.2}x",
            json_content.len() as f64 / binary.len() as f64
        );
        println!();
        println!("  Elements: {}", num_elements);
        println!("  Pages:    {}", pages.len());
        println!("  Acts:     {}", num_acts);
        println!("  Beats:    {}", total_beats);

        let sequence = manager
            .sequence()
            .context("Failed to read sequence for stats")?;
        let mut by_type: Vec<(ElementType, usize)> = Vec::new();
        for kind in ElementType::ALL {
            let count = sequence.iter().filter(|e| e.element_type == kind).count();
            if count > 0 {
                by_type.push((kind, count));
            }
        }
        if !by_type.is_empty() {
            println!();
            for (kind, count) in by_type {
                println!("  {:<14} {}", format!("{}:", kind), count);
            }
        }
    }

    println!();
    println!(
        "Successfully converted {} → {}",
        input_path.display(),
        output_path.display()
    );
    if let Some(path) = outline_path {
        println!("Outline written to {}", path.display());
    }

    Ok(())
}
