use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expo_citas::logic::{available_slots, candidate_dates};
use expo_common::models::{
    Cita, Dia, DiaDisponible, Disponibilidad, EstatusCita, ParticipanteRef, TipoParticipante,
};

// Helper function to create a weekday map open 08:00-20:00
fn full_week() -> Disponibilidad {
    Dia::TODOS
        .iter()
        .map(|dia| {
            (
                *dia,
                DiaDisponible {
                    enabled: true,
                    inicio: Some("08:00".to_string()),
                    fin: Some("20:00".to_string()),
                },
            )
        })
        .collect()
}

// Helper function to create `count` bookings spread over the given days
fn bookings(dias: &[NaiveDate], count: usize) -> Vec<Cita> {
    let persona = ParticipanteRef {
        id: "bench".to_string(),
        tipo: TipoParticipante::Expositor,
        nombre: "Bench".to_string(),
        email: "bench@example.com".to_string(),
    };
    (0..count)
        .map(|i| {
            let minutes = 8 * 60 + (i % 24) as u32 * 30;
            Cita {
                id: Some(format!("c{}", i)),
                fecha: dias[i % dias.len()],
                hora: format!("{:02}:{:02}", minutes / 60, minutes % 60),
                tema: String::new(),
                notas: String::new(),
                estatus: if i % 5 == 0 {
                    EstatusCita::Rechazada
                } else {
                    EstatusCita::Confirmada
                },
                solicitante: persona.clone(),
                receptor: persona.clone(),
                motivo_rechazo: None,
                reagendada_por: None,
                creada_en: Utc::now(),
                actualizada_en: Utc::now(),
            }
        })
        .collect()
}

fn benchmark_available_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("available_slots");
    let dias: Vec<NaiveDate> = (0..3)
        .filter_map(|d| NaiveDate::from_ymd_opt(2025, 10, 23 + d))
        .collect();
    let map = full_week();

    let none: Vec<Cita> = Vec::new();
    group.bench_function("default_window_no_bookings", |b| {
        b.iter(|| available_slots(black_box(None), black_box(&none), black_box(dias[0])))
    });

    let few = bookings(&dias, 10);
    group.bench_function("configured_window_10_bookings", |b| {
        b.iter(|| available_slots(black_box(Some(&map)), black_box(&few), black_box(dias[1])))
    });

    let many = bookings(&dias, 200);
    group.bench_function("configured_window_200_bookings", |b| {
        b.iter(|| available_slots(black_box(Some(&map)), black_box(&many), black_box(dias[1])))
    });

    group.bench_function("candidate_dates_200_bookings", |b| {
        b.iter(|| candidate_dates(black_box(&dias), black_box(Some(&map)), black_box(&many)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_available_slots);
criterion_main!(benches);
