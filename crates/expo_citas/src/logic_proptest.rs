#[cfg(test)]
mod tests {
    use crate::logic::{available_slots, format_hora, parse_hora, SLOT_MINUTES};
    use chrono::{NaiveDate, Utc};
    use expo_common::models::{
        Cita, Dia, DiaDisponible, Disponibilidad, EstatusCita, ParticipanteRef, TipoParticipante,
    };
    use proptest::prelude::*;

    // Helper function to build a one-day availability map for the given date
    fn map_for(fecha: NaiveDate, inicio: u32, fin: u32) -> Disponibilidad {
        let mut map = Disponibilidad::new();
        map.insert(
            Dia::from_date(fecha),
            DiaDisponible {
                enabled: true,
                inicio: Some(format_hora(inicio)),
                fin: Some(format_hora(fin)),
            },
        );
        map
    }

    // Helper function to create bookings at the given slot starts
    fn bookings(fecha: NaiveDate, starts: &[u32], estatus: EstatusCita) -> Vec<Cita> {
        let persona = ParticipanteRef {
            id: "p".to_string(),
            tipo: TipoParticipante::Expositor,
            nombre: "P".to_string(),
            email: "p@example.com".to_string(),
        };
        starts
            .iter()
            .enumerate()
            .map(|(i, start)| Cita {
                id: Some(format!("c{}", i)),
                fecha,
                hora: format_hora(*start),
                tema: String::new(),
                notas: String::new(),
                estatus,
                solicitante: persona.clone(),
                receptor: persona.clone(),
                motivo_rechazo: None,
                reagendada_por: None,
                creada_en: Utc::now(),
                actualizada_en: Utc::now(),
            })
            .collect()
    }

    fn fecha(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 20).unwrap() + chrono::Duration::days(offset)
    }

    proptest! {
        // Test that every slot lies inside the window on the 30-minute grid
        #[test]
        fn test_slots_within_window(
            day in 0..7i64,
            start_half_hours in 0..32u32,
            length_half_hours in 0..16u32,
        ) {
            let fecha = fecha(day);
            let inicio = start_half_hours * SLOT_MINUTES;
            let fin = inicio + length_half_hours * SLOT_MINUTES;
            let map = map_for(fecha, inicio, fin);

            let slots = available_slots(Some(&map), &[], fecha).unwrap();
            prop_assert_eq!(slots.len() as u32, length_half_hours);
            for slot in &slots {
                let minutes = parse_hora(slot).unwrap();
                prop_assert!(minutes >= inicio && minutes < fin);
                prop_assert_eq!((minutes - inicio) % SLOT_MINUTES, 0);
            }
        }

        // Test that no occupied slot is ever offered
        #[test]
        fn test_booked_slots_are_excluded(
            day in 0..7i64,
            booked in proptest::collection::vec(0..16u32, 0..8),
        ) {
            let fecha = fecha(day);
            let inicio = 9 * 60;
            let fin = 17 * 60;
            let starts: Vec<u32> = booked.iter().map(|h| inicio + h * SLOT_MINUTES).collect();
            let citas = bookings(fecha, &starts, EstatusCita::Confirmada);

            let slots = available_slots(Some(&map_for(fecha, inicio, fin)), &citas, fecha).unwrap();
            for start in &starts {
                let booked_slot = format_hora(*start);
                prop_assert!(!slots.contains(&booked_slot));
            }
            let mut distinct = starts.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(slots.len(), 16 - distinct.len());
        }

        // Test that rejected bookings never reduce the offer
        #[test]
        fn test_rejected_bookings_free_their_slot(
            booked in proptest::collection::vec(0..16u32, 0..8),
        ) {
            let fecha = fecha(4);
            let inicio = 9 * 60;
            let starts: Vec<u32> = booked.iter().map(|h| inicio + h * SLOT_MINUTES).collect();
            let citas = bookings(fecha, &starts, EstatusCita::Rechazada);

            let slots = available_slots(Some(&map_for(fecha, inicio, 17 * 60)), &citas, fecha).unwrap();
            prop_assert_eq!(slots.len(), 16);
        }

        // Test that slot strings parse back to themselves
        #[test]
        fn test_slot_strings_are_canonical(minutes in 0..(24 * 60u32)) {
            let text = format_hora(minutes);
            prop_assert_eq!(parse_hora(&text).unwrap(), minutes);
            prop_assert_eq!(text.len(), 5);
        }
    }
}
