//! Benchmarks for quote and booking handlers
//!
//! Run with: cargo bench --package clearhaul-api
//!
//! These benchmarks measure estimate pricing and data transformations
//! (not database queries).

use chrono::{Duration, Utc};
use clearhaul_core::models::{
    Booking, BookingStatus, ItemKind, LaborKind, LoadSize, PriceCatalog, QuoteSelection, TimeSlot,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use uuid::Uuid;

/// Create a mock booking for testing
fn create_mock_booking(id: i64, confirmed: bool) -> Booking {
    let now = Utc::now();
    Booking {
        id,
        reference: Uuid::new_v4(),
        customer_name: format!("Customer {}", id),
        customer_phone: "555-010-2030".to_string(),
        customer_email: Some("customer@example.com".to_string()),
        service_address: "100 Main St".to_string(),
        service_date: now.date_naive() + Duration::days(id % 14),
        time_slot: TimeSlot::ALL[(id % 5) as usize],
        load_size: Some(LoadSize::Half),
        status: if confirmed {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        },
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

/// Build a selection with a typical mix of extras
fn loaded_selection() -> QuoteSelection {
    let mut selection = QuoteSelection::new(LoadSize::Half);
    selection.adjust_item(ItemKind::Mattress, 2);
    selection.adjust_item(ItemKind::Tire, 4);
    selection.adjust_item(ItemKind::FurnitureLarge, 1);
    selection.adjust_labor(LaborKind::Stairs, 2);
    selection
}

/// Benchmark quote estimate pricing
fn bench_estimate_calculation(c: &mut Criterion) {
    let catalog = PriceCatalog::standard();
    let selection = loaded_selection();

    c.bench_function("quote_estimate", |b| {
        b.iter(|| {
            let _estimate = catalog.estimate(black_box(&selection));
        });
    });
}

/// Benchmark Booking to BookingResponse conversion
fn bench_booking_conversion(c: &mut Criterion) {
    use clearhaul_api::dto::BookingResponse;

    let booking = create_mock_booking(1, true);

    c.bench_function("booking_to_response_conversion", |b| {
        b.iter(|| {
            let _response = BookingResponse::from(black_box(booking.clone()));
        });
    });
}

/// Benchmark bulk conversion for export
fn bench_bulk_export_conversion(c: &mut Criterion) {
    use clearhaul_api::dto::BookingExportRow;

    let mut group = c.benchmark_group("bulk_export_conversion");

    for size in [100, 1_000, 10_000].iter() {
        let bookings: Vec<Booking> = (0..*size)
            .map(|i| create_mock_booking(i, i % 2 == 0))
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let _rows: Vec<BookingExportRow> = black_box(&bookings)
                    .iter()
                    .cloned()
                    .map(BookingExportRow::from)
                    .collect();
            });
        });
    }

    group.finish();
}

/// Benchmark the open-slot filter over a day's bookings
fn bench_open_slot_filter(c: &mut Criterion) {
    // A realistic day: four of five slots taken, one cancelled.
    let mut day: Vec<Booking> = (0..4).map(|i| create_mock_booking(i, true)).collect();
    day.push(create_mock_booking(4, false));
    day[4].status = BookingStatus::Cancelled;

    c.bench_function("open_slot_filter", |b| {
        b.iter(|| {
            let _open = TimeSlot::open_slots(black_box(&day));
        });
    });
}

/// Benchmark JSON serialization
fn bench_json_serialization(c: &mut Criterion) {
    use clearhaul_api::dto::BookingResponse;

    let mut group = c.benchmark_group("json_serialization");

    for size in [10, 100, 1_000].iter() {
        let responses: Vec<BookingResponse> = (0..*size)
            .map(|i| BookingResponse::from(create_mock_booking(i, true)))
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let _json = serde_json::to_string(black_box(&responses)).unwrap();
            });
        });
    }

    group.finish();
}

/// Benchmark CSV line formatting
fn bench_csv_formatting(c: &mut Criterion) {
    use clearhaul_api::dto::BookingExportRow;

    let row = BookingExportRow::from(create_mock_booking(1, true));

    c.bench_function("csv_line_formatting", |b| {
        b.iter(|| {
            let _csv_line = format!(
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                black_box(&row.id),
                black_box(&row.reference),
                black_box(&row.customer_name),
                black_box(&row.customer_phone),
                black_box(&row.customer_email),
                black_box(&row.service_address),
                black_box(&row.service_date),
                black_box(&row.time_slot),
                black_box(&row.load_size),
                black_box(&row.status),
                black_box(&row.notes),
                black_box(&row.created_at)
            );
        });
    });
}

/// Benchmark filtering operations
fn bench_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtering");

    for size in [1_000, 10_000, 100_000].iter() {
        let bookings: Vec<Booking> = (0..*size)
            .map(|i| {
                let mut booking = create_mock_booking(i, i % 2 == 0);
                if i % 7 == 0 {
                    booking.status = BookingStatus::Cancelled;
                }
                booking
            })
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("filter_blocking", size), size, |b, _| {
            b.iter(|| {
                let _filtered: Vec<&Booking> = black_box(&bookings)
                    .iter()
                    .filter(|booking| booking.blocks_slot())
                    .collect();
            });
        });

        let today = Utc::now().date_naive();
        group.bench_with_input(BenchmarkId::new("filter_date", size), size, |b, _| {
            b.iter(|| {
                let _filtered: Vec<&Booking> = black_box(&bookings)
                    .iter()
                    .filter(|booking| booking.service_date == today)
                    .collect();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_estimate_calculation,
    bench_booking_conversion,
    bench_bulk_export_conversion,
    bench_open_slot_filter,
    bench_json_serialization,
    bench_csv_formatting,
    bench_filtering
);

criterion_main!(benches);
