//! Binary size analysis for slugline documents.
//!
//! Run with: cargo run --release --example binary_sizes

use slugline::{Element, ElementType, ScriptManager};

fn create_realistic_element(id: &str, text_len: usize) -> Element {
    let text: String = (0..text_len)
        .map(|i| {
            if i % 6 == 5 {
                ' '
            } else {
                (b'a' + (i % 26) as u8) as char
            }
        })
        .collect();

    Element::new(id, ElementType::Action)
        .with_text(&text)
        .with_tag("location-stage-4")
        .with_tag("day-shoot")
        .with_beat("beat-0001", "act-1")
}

fn main() {
    println!("=== Slugline Binary Size Analysis ===\n");

    // Empty document
    let mut manager = ScriptManager::new();
    let empty_size = manager.save().len();
    println!("## Serialized Document Sizes\n");
    println!("| Elements | Text Len | Binary Size | Per Element |");
    println!("|----------|----------|-------------|-------------|");
    println!(
        "| 0        | -        | {} bytes   | -           |",
        empty_size
    );

    // Test various document sizes
    let test_cases = [
        (1, 50),    // 1 element, short line
        (1, 500),   // 1 element, long paragraph
        (10, 100),  // 10 elements, medium paragraphs
        (50, 100),  // 50 elements
        (100, 100), // 100 elements
    ];

    for (num_elements, text_len) in test_cases {
        let mut manager = ScriptManager::new();

        for i in 0..num_elements {
            let id = format!("el-{:04}", i);
            let element = create_realistic_element(&id, text_len);
            manager.append_element(&id, element).unwrap();
        }

        let binary = manager.save();
        let size = binary.len();
        let per_element = if num_elements > 0 {
            (size - empty_size) / num_elements
        } else {
            0
        };

        let size_str = if size > 1024 * 1024 {
            format!("{:.2} MB", size as f64 / 1024.0 / 1024.0)
        } else if size > 1024 {
            format!("{:.2} KB", size as f64 / 1024.0)
        } else {
            format!("{} bytes", size)
        };

        let per_element_str = if per_element > 1024 {
            format!("{:.2} KB", per_element as f64 / 1024.0)
        } else {
            format!("{} bytes", per_element)
        };

        println!(
            "| {:8} | {:8} | {:>11} | {:>11} |",
            num_elements, text_len, size_str, per_element_str
        );
    }

    println!();

    // Incremental sync message sizes
    println!("## Sync Message Sizes\n");
    println!("| Operation | Message Size |");
    println!("|-----------|--------------|");

    // Create base document
    let mut base = ScriptManager::new();
    let element = create_realistic_element("base-el", 100);
    base.append_element("base-el", element).unwrap();
    let base_heads = base.get_heads();

    // Marker change
    base.set_page_break("base-el", true).unwrap();
    let marker_sync = base
        .generate_sync_message(&base_heads)
        .map(|b| b.len())
        .unwrap_or(0);
    println!("| Page break toggle | {} bytes |", marker_sync);

    let heads_after_marker = base.get_heads();

    // Add new element
    let new_element = create_realistic_element("new-el", 100);
    base.append_element("new-el", new_element).unwrap();
    let new_element_sync = base
        .generate_sync_message(&heads_after_marker)
        .map(|b| b.len())
        .unwrap_or(0);
    println!(
        "| Add new element (100 char text) | {} bytes |",
        new_element_sync
    );

    println!();

    // JSON export size comparison
    println!("## JSON vs Binary Comparison\n");
    let mut manager = ScriptManager::new();
    for i in 0..10 {
        let id = format!("el-{:04}", i);
        let element = create_realistic_element(&id, 200);
        manager.append_element(&id, element).unwrap();
    }

    let binary_size = manager.save().len();
    let state = manager.get_state().unwrap();
    let json_size = serde_json::to_string(&state).unwrap().len();

    println!("| Format | Size (10 elements, 200 char text) |");
    println!("|--------|-----------------------------------|");
    println!("| Binary | {:.2} KB |", binary_size as f64 / 1024.0);
    println!("| JSON   | {:.2} KB |", json_size as f64 / 1024.0);
    println!(
        "| Ratio  | {:.2}x smaller |",
        json_size as f64 / binary_size as f64
    );
}
