// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_property_grid`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use understory_property::{
    Category, Color, Inspectable, MemberError, MemberInfo, Property, Value, ValueType,
};
use understory_property_grid::{ObjectHandle, ObjectPropertyGrid, PropertyContext, PropertyGrid};

const CATEGORIES: [&str; 4] = ["Layout", "Appearance", "Behavior", "Data"];

fn populated(count: usize) -> PropertyGrid {
    let mut grid = PropertyGrid::new();
    for i in 0..count {
        let category = CATEGORIES[i % CATEGORIES.len()];
        let (value_type, value) = if i % 3 == 0 {
            (ValueType::Color, Value::Color(Color::rgb(0x20, 0x40, 0x80)))
        } else {
            (ValueType::Int, Value::from(i32::try_from(i).unwrap_or(i32::MAX)))
        };
        grid.add_property(
            Property::new(format!("p{i}"), value_type).with_attribute(Category::new(category)),
            value,
        );
    }
    grid
}

struct Widget {
    fields: Vec<i32>,
}

impl Inspectable for Widget {
    fn members(&self) -> Vec<MemberInfo> {
        (0..self.fields.len())
            .map(|i| MemberInfo::read_write(format!("f{i}"), ValueType::Int))
            .collect()
    }

    fn member(&self, name: &str) -> Option<Value> {
        let index: usize = name.strip_prefix('f')?.parse().ok()?;
        self.fields.get(index).copied().map(Value::Int)
    }

    fn set_member(&mut self, name: &str, value: &Value) -> Result<(), MemberError> {
        let slot = name
            .strip_prefix('f')
            .and_then(|i| i.parse::<usize>().ok())
            .and_then(|i| self.fields.get_mut(i))
            .ok_or_else(|| MemberError::UnknownMember(name.into()))?;
        match value {
            Value::Int(v) => {
                *slot = *v;
                Ok(())
            }
            _ => Err(MemberError::UnknownMember(name.into())),
        }
    }
}

fn bench_grid(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: Value={} PropertyContext={} PropertyGrid={}",
            size_of::<Value>(),
            size_of::<PropertyContext>(),
            size_of::<PropertyGrid>(),
        );
    });

    let mut group = c.benchmark_group("property_grid/populate");
    for count in [16_usize, 256] {
        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            b.iter(|| black_box(populated(count)));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("property_grid/query");
    let grid = populated(256);
    group.bench_function("property_context", |b| {
        b.iter(|| black_box(grid.property_context(black_box("p200")).value()));
    });
    group.bench_function("display_text", |b| {
        b.iter(|| black_box(grid.display_text(black_box("p201"))));
    });
    group.bench_function("visible_nodes", |b| {
        b.iter(|| black_box(grid.tree().visible_nodes().len()));
    });
    group.finish();

    let mut group = c.benchmark_group("property_grid/mutate");
    group.bench_function("set_property_value/int", |b| {
        let mut grid = populated(256);
        grid.subscribe(|ctx| {
            black_box(ctx.value());
        });
        let mut next = 0_i32;
        b.iter(|| {
            next = next.wrapping_add(1);
            black_box(grid.set_property_value("p200", Value::Int(next)))
        });
    });
    group.bench_function("commit_text/color", |b| {
        let mut grid = populated(256);
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let text = if flip { "1, 2, 3" } else { "4, 5, 6, (7)" };
            black_box(grid.commit_text("p201", text))
        });
    });
    group.bench_function("toggle_categories", |b| {
        b.iter_batched(
            || populated(256),
            |mut grid| {
                grid.set_show_categories(false);
                black_box(grid.tree().visible_nodes().len());
                grid.set_show_categories(true);
                black_box(grid);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();

    let mut group = c.benchmark_group("property_grid/object_selection");
    for objects in [1_usize, 8] {
        let selection: Vec<ObjectHandle> = (0..objects)
            .map(|i| {
                let fields = (0..32).map(|f| if f % 2 == 0 { f } else { f + i32::from(i > 0) });
                Rc::new(RefCell::new(Widget {
                    fields: fields.collect(),
                })) as ObjectHandle
            })
            .collect();
        group.bench_function(BenchmarkId::new("rebuild", objects), |b| {
            let mut grid = ObjectPropertyGrid::new();
            b.iter(|| {
                grid.set_selection(selection.clone());
                black_box(grid.grid().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
