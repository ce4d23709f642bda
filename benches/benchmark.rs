//! Benchmarks for the collaborative screenplay manager.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slugline::screenplay::classify::classify;
use slugline::screenplay::{estimate_lines, DEFAULT_LINES_PER_PAGE};
use slugline::{Element, ElementType, ScriptManager};

/// Builds a script that cycles through a small scene pattern.
fn seed_script(num_elements: usize) -> ScriptManager {
    let mut manager = ScriptManager::new();
    for i in 0..num_elements {
        let (kind, text) = match i % 5 {
            0 => (ElementType::SceneHeading, "INT. WRITERS ROOM - DAY"),
            1 => (ElementType::Action, "The room hums. Laptops everywhere."),
            2 => (ElementType::Character, "MIRA"),
            3 => (ElementType::Dialogue, "We are not cutting the cold open."),
            _ => (ElementType::Transition, "CUT TO:"),
        };
        let id = format!("el-{}", i);
        manager
            .append_element(&id, Element::new(id.as_str(), kind).with_text(text))
            .unwrap();
    }
    manager
}

fn bench_new(c: &mut Criterion) {
    c.bench_function("new", |b| {
        b.iter(|| {
            black_box(ScriptManager::new())
        })
    });
}

fn bench_append_element_simple(c: &mut Criterion) {
    c.bench_function("append_element_simple", |b| {
        let mut manager = ScriptManager::new();
        let mut i = 0u64;
        b.iter(|| {
            let id = format!("el-{}", i);
            let element = Element::new(id.as_str(), ElementType::Action)
                .with_text("She stares at the blinking cursor.");
            manager.append_element(&id, element).unwrap();
            i += 1;
        })
    });
}

fn bench_append_element_full(c: &mut Criterion) {
    c.bench_function("append_element_full", |b| {
        let mut manager = ScriptManager::new();
        let mut i = 0u64;
        b.iter(|| {
            let id = format!("el-{}", i);
            let element = Element::new(id.as_str(), ElementType::SceneHeading)
                .with_text("INT. COMMAND CENTER - NIGHT")
                .with_tag("night-shoot")
                .with_tag("vfx")
                .with_beat("beat-midpoint", "act-2")
                .with_page_break(i % 10 == 0);
            manager.append_element(&id, element).unwrap();
            i += 1;
        })
    });
}

fn bench_insert_after(c: &mut Criterion) {
    c.bench_function("insert_after_enter", |b| {
        let mut manager = ScriptManager::new();
        manager
            .append_element(
                "seed",
                Element::new("seed", ElementType::SceneHeading).with_text("INT. STAGE - NIGHT"),
            )
            .unwrap();

        let mut last = String::from("seed");
        b.iter(|| {
            // Each press of Enter spawns the follow-on type for the block above
            last = manager.insert_element_after(&last, None).unwrap();
        })
    });
}

fn bench_set_text(c: &mut Criterion) {
    c.bench_function("set_text_reclassify", |b| {
        let mut manager = seed_script(4);

        let mut i = 0u64;
        b.iter(|| {
            // Alternate between text that keeps the type and text that flips it
            let text = if i % 2 == 0 {
                "int. writers room - day"
            } else {
                "The whiteboard is full again."
            };
            black_box(manager.set_element_text("el-0", text).unwrap());
            i += 1;
        })
    });
}

fn bench_cycle_type(c: &mut Criterion) {
    c.bench_function("cycle_element_type", |b| {
        let mut manager = seed_script(3);

        b.iter(|| {
            // Tab walks scene-heading -> action -> character -> scene-heading
            black_box(manager.cycle_element_type("el-0").unwrap());
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_line", |b| {
        b.iter(|| {
            black_box(classify(black_box("INT. COMMAND CENTER - NIGHT"), None));
            black_box(classify(black_box("MIRA"), Some(ElementType::Action)));
            black_box(classify(black_box("(beat)"), Some(ElementType::Character)));
            black_box(classify(
                black_box("She closes the laptop and walks out."),
                Some(ElementType::Transition),
            ));
        })
    });
}

fn bench_estimate_lines(c: &mut Criterion) {
    let paragraph = "The bullpen at full tilt. Writers shout over each other while \
                     the showrunner paces, script pages in one hand and cold coffee \
                     in the other. Nobody notices the network executive in the door.";

    c.bench_function("estimate_lines", |b| {
        b.iter(|| {
            black_box(estimate_lines(black_box(paragraph), ElementType::Action));
            black_box(estimate_lines(
                black_box("We are not cutting the cold open."),
                ElementType::Dialogue,
            ));
        })
    });
}

fn bench_get_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_state");

    for num_elements in [1, 10, 50, 100].iter() {
        let mut manager = seed_script(*num_elements);
        let bytes = manager.save();

        group.bench_with_input(
            BenchmarkId::new("elements", num_elements),
            num_elements,
            |b, _| {
                b.iter(|| {
                    // Force re-hydration by loading fresh
                    let mut m = ScriptManager::from_bytes(&bytes).unwrap();
                    black_box(m.get_state().unwrap())
                })
            },
        );
    }
    group.finish();
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");

    for num_elements in [1, 10, 50].iter() {
        let mut manager = seed_script(*num_elements);

        group.bench_with_input(
            BenchmarkId::new("elements", num_elements),
            num_elements,
            |b, _| {
                b.iter(|| {
                    black_box(manager.save())
                })
            },
        );
    }
    group.finish();
}

fn bench_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");

    for num_elements in [10, 50, 200].iter() {
        let mut manager = seed_script(*num_elements);
        // Warm the cache so the measurement is layout, not hydration
        manager.get_state().unwrap();

        group.bench_with_input(
            BenchmarkId::new("elements", num_elements),
            num_elements,
            |b, _| {
                b.iter(|| {
                    black_box(manager.paginate(DEFAULT_LINES_PER_PAGE).unwrap())
                })
            },
        );
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    c.bench_function("merge_10_elements", |b| {
        let mut base = seed_script(10);
        let base_bytes = base.save();

        b.iter(|| {
            let mut client_a = ScriptManager::from_bytes(&base_bytes).unwrap();
            let mut client_b = ScriptManager::from_bytes(&base_bytes).unwrap();

            // Make changes
            client_a
                .append_element(
                    "new-a",
                    Element::new("new-a", ElementType::Action).with_text("A phone buzzes."),
                )
                .unwrap();
            client_b
                .append_element(
                    "new-b",
                    Element::new("new-b", ElementType::Character).with_text("DESK PA"),
                )
                .unwrap();

            // Merge
            client_a.merge(&mut client_b).unwrap();
            black_box(&client_a);
        })
    });
}

fn bench_tags_reconcile(c: &mut Criterion) {
    c.bench_function("tag_toggle_reconcile", |b| {
        let mut manager = seed_script(3);

        b.iter(|| {
            manager.add_element_tag("el-1", "pickup").unwrap();
            manager.remove_element_tag("el-1", "pickup").unwrap();
        })
    });
}

fn bench_targeted_markers(c: &mut Criterion) {
    c.bench_function("set_marker_direct", |b| {
        let mut manager = seed_script(3);

        let mut i = 0u64;
        b.iter(|| {
            manager.set_page_break("el-0", i % 2 == 0).unwrap();
            manager
                .set_element_beat("el-0", "beat-opening", "act-1")
                .unwrap();
            i += 1;
        })
    });
}

criterion_group!(
    benches,
    bench_new,
    bench_append_element_simple,
    bench_append_element_full,
    bench_insert_after,
    bench_set_text,
    bench_cycle_type,
    bench_classify,
    bench_estimate_lines,
    bench_get_state,
    bench_save,
    bench_paginate,
    bench_merge,
    bench_tags_reconcile,
    bench_targeted_markers,
);

criterion_main!(benches);
