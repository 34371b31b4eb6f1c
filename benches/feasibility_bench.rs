// ABOUTME: Criterion benchmarks for the production feasibility calculator
// ABOUTME: Measures simulation cost as recipe size grows, over an in-memory stock map
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Criterion benchmarks for feasibility simulation.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glaze_stock_server::config::{MissingMaterialPolicy, ProductionConfig};
use glaze_stock_server::models::{CompositionEntry, MaterialCategory, StockLevel};
use glaze_stock_server::production::feasibility;

/// Recipe with `bases` base materials splitting 100 % and two oxides
fn generate_recipe(bases: usize) -> Vec<CompositionEntry> {
    let share = 100.0 / bases as f64;
    let mut composition: Vec<CompositionEntry> = (0..bases)
        .map(|i| CompositionEntry {
            material: format!("base_{i}"),
            category: MaterialCategory::Base,
            percentage: share,
        })
        .collect();
    for (name, percentage) in [("cobalt", 1.5), ("fer", 4.0)] {
        composition.push(CompositionEntry {
            material: name.to_owned(),
            category: MaterialCategory::Oxide,
            percentage,
        });
    }
    composition
}

fn generate_stock(composition: &[CompositionEntry]) -> HashMap<String, StockLevel> {
    composition
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            (
                entry.material.clone(),
                StockLevel {
                    quantity: 250.0 * (i + 1) as f64,
                    category: entry.category,
                },
            )
        })
        .collect()
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("feasibility_simulate");
    let config = ProductionConfig::default();

    for bases in [2, 8, 32] {
        let composition = generate_recipe(bases);
        let stock = generate_stock(&composition);
        group.throughput(Throughput::Elements(composition.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(bases), &bases, |b, _| {
            b.iter(|| {
                feasibility::simulate(
                    "Bench",
                    black_box(&composition),
                    black_box(1000.0),
                    &stock,
                    &config,
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_missing_material_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("feasibility_missing_material");
    let composition = generate_recipe(8);
    let mut stock = generate_stock(&composition);
    stock.remove("base_3");

    for policy in [MissingMaterialPolicy::ForceZero, MissingMaterialPolicy::Exclude] {
        let config = ProductionConfig {
            missing_material_policy: policy,
            ..ProductionConfig::default()
        };
        group.bench_function(policy.to_string(), |b| {
            b.iter(|| {
                feasibility::simulate("Bench", black_box(&composition), 1000.0, &stock, &config)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simulate, bench_missing_material_policy);
criterion_main!(benches);
