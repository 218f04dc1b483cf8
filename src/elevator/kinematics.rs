use std::collections::VecDeque;

/**
 * Motion profile generation under velocity and acceleration caps.
 *
 * A journey between two floors is planned as a short sequence of
 * constant-acceleration segments: accelerate at the cap, optionally cruise
 * at the velocity cap, then decelerate back to rest exactly at the target.
 * Durations are fractional tick counts; the integrator in `advance_tick`
 * splits a tick across segment boundaries so the planned stop is exact.
 */

/// One constant-acceleration phase of motion. `ticks` is the remaining
/// duration of the phase, in simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSegment {
    pub accel: f64,
    pub ticks: f64,
}

/// Velocities below this are treated as standstill.
pub const VEL_EPSILON: f64 = 1e-6;

/// Segment durations below this are treated as expired.
const TICK_EPSILON: f64 = 1e-9;

/// Minimum distance needed to brake from `vel` to rest at `max_accel`.
pub fn braking_distance(vel: f64, max_accel: f64) -> f64 {
    vel * vel / (2.0 * max_accel)
}

/// Minimum distance needed to brake from the velocity cap to rest.
pub fn stopping_distance(max_vel: f64, max_accel: f64) -> f64 {
    braking_distance(max_vel, max_accel)
}

/// Plan the segments that move the cabin from `src_y` to rest at `dest_y`.
///
/// Produces a trapezoidal profile (accelerate, cruise, decelerate) when the
/// distance allows reaching `max_vel`, and a symmetric triangular profile
/// (accelerate, decelerate) otherwise. A zero-distance request yields no
/// segments.
pub fn profile_to(src_y: f64, dest_y: f64, max_vel: f64, max_accel: f64) -> Vec<AccelSegment> {
    let delta = dest_y - src_y;
    let distance = delta.abs();
    if distance < TICK_EPSILON {
        return Vec::new();
    }
    let sign = delta.signum();

    // Distance consumed by a full-speed ramp-up plus ramp-down.
    let full_ramps = max_vel * max_vel / max_accel;

    if distance >= full_ramps {
        let ramp_ticks = max_vel / max_accel;
        let cruise_ticks = (distance - full_ramps) / max_vel;
        let mut segments = vec![AccelSegment {
            accel: sign * max_accel,
            ticks: ramp_ticks,
        }];
        if cruise_ticks > TICK_EPSILON {
            segments.push(AccelSegment {
                accel: 0.0,
                ticks: cruise_ticks,
            });
        }
        segments.push(AccelSegment {
            accel: -sign * max_accel,
            ticks: ramp_ticks,
        });
        segments
    } else {
        // Too short to reach the velocity cap: peak at sqrt(a * d).
        let peak_vel = (max_accel * distance).sqrt();
        let ramp_ticks = peak_vel / max_accel;
        vec![
            AccelSegment {
                accel: sign * max_accel,
                ticks: ramp_ticks,
            },
            AccelSegment {
                accel: -sign * max_accel,
                ticks: ramp_ticks,
            },
        ]
    }
}

/// Advance position and velocity through the segment queue by one tick.
///
/// The tick is split across segment boundaries, each slice integrated in
/// closed form. Consumption stops early when the cabin comes to rest on a
/// segment boundary: that is the end of a journey, and any segments still
/// queued belong to the next scheduled floor.
///
/// Returns the acceleration active during the last integrated slice, or
/// zero when the queue is empty.
pub fn advance_tick(y: &mut f64, vel: &mut f64, segments: &mut VecDeque<AccelSegment>) -> f64 {
    let mut remaining = 1.0;
    let mut accel = 0.0;
    while remaining > TICK_EPSILON {
        let Some(segment) = segments.front_mut() else {
            break;
        };
        let h = segment.ticks.min(remaining);
        *y += *vel * h + 0.5 * segment.accel * h * h;
        *vel += segment.accel * h;
        segment.ticks -= h;
        remaining -= h;
        accel = segment.accel;
        if segment.ticks <= TICK_EPSILON {
            segments.pop_front();
            if vel.abs() < VEL_EPSILON {
                // Came to rest: journey boundary.
                break;
            }
        }
    }
    accel
}
