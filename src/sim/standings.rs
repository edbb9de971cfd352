//! Race standings
//!
//! Finished cars rank by finishing order, ahead of everyone still racing.
//! Cars still racing rank by laps, then by progress through the lap.

use std::cmp::Ordering;

use super::state::Car;

/// Standings comparator; `Less` means `a` ranks ahead of `b`
pub fn compare_standings(a: &Car, b: &Car) -> Ordering {
    match (a.finished, b.finished) {
        (true, true) => a
            .finish_position
            .unwrap_or(u32::MAX)
            .cmp(&b.finish_position.unwrap_or(u32::MAX)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => b.laps_completed.cmp(&a.laps_completed).then_with(|| {
            b.track_progress
                .partial_cmp(&a.track_progress)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

/// Sorted copy of `cars` with each car's 1-based `position` filled in
pub fn calculate_positions(cars: &[Car]) -> Vec<Car> {
    let mut sorted = cars.to_vec();
    sorted.sort_by(compare_standings);
    for (i, car) in sorted.iter_mut().enumerate() {
        car.position = Some(i as u32 + 1);
    }
    sorted
}
