// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use infobars::domain::infobar::TabId;
use infobars::infobar::headless::{settle, HeadlessHost, RecordingCounterpart};
use infobars::infobar::{BarText, ConfirmBar, InfoBarContainer, MessageBar};
use std::hint::black_box;
use url::Url;

fn fresh_container() -> InfoBarContainer<HeadlessHost, RecordingCounterpart> {
    InfoBarContainer::new(
        Some(TabId::new(1)),
        HeadlessHost::new(),
        RecordingCounterpart::new(),
    )
}

fn add_remove_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("container_drain");

    for count in [4usize, 32, 256] {
        group.bench_with_input(BenchmarkId::new("add_then_remove", count), &count, |b, &count| {
            b.iter(|| {
                let mut container = fresh_container();
                let ids: Vec<_> = (0..count)
                    .filter_map(|_| container.add_message(MessageBar::info(BarText::literal("x"))))
                    .collect();
                settle(&mut container);
                for id in ids {
                    container.remove(id);
                }
                black_box(settle(&mut container))
            });
        });

        group.bench_with_input(BenchmarkId::new("interleaved", count), &count, |b, &count| {
            b.iter(|| {
                let mut container = fresh_container();
                let mut previous = None;
                for _ in 0..count {
                    let added = container.add_message(MessageBar::info(BarText::literal("x")));
                    if let Some(id) = previous.take() {
                        container.remove(id);
                    }
                    previous = added;
                }
                black_box(settle(&mut container))
            });
        });
    }

    group.finish();
}

fn navigation_sweep_benchmark(c: &mut Criterion) {
    let start = Url::parse("https://www.example.com/").expect("valid url");
    let next = Url::parse("https://www.example.com/next").expect("valid url");

    c.bench_function("sweep_expired_mixed", |b| {
        b.iter(|| {
            let mut container = fresh_container().with_url(start.clone());
            for n in 0..64 {
                if n % 2 == 0 {
                    container.add_message(MessageBar::info(BarText::literal("local")));
                } else {
                    let remote = container.counterpart_mut().open_handle();
                    let _ = container
                        .add_confirm_from_counterpart(remote, ConfirmBar::new(BarText::literal("paired")));
                }
            }
            settle(&mut container);
            let expired = container.sweep_expired(&next);
            settle(&mut container);
            black_box(expired)
        });
    });
}

criterion_group!(benches, add_remove_benchmark, navigation_sweep_benchmark);
criterion_main!(benches);
