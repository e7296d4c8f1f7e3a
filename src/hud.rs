//! Telemetry overlay values driven by animation progress.
//!
//! Everything here is a pure function of its arguments: a scene passes the
//! progress of the current beat and gets back the numbers and labels to
//! draw for that frame. Progress is expected in `[0, 1]`.

use crate::geometry::Color;
use crate::palette;
use serde::Serialize;
use std::fmt;

/// `start + progress * (end - start)`, exact at both ends and never
/// overshooting `end` through rounding.
pub fn interpolate(start: f32, end: f32, progress: f32) -> f32 {
    if progress >= 1.0 {
        return end;
    }
    let value = start + progress * (end - start);
    if start <= end {
        value.clamp(start, end)
    } else {
        value.clamp(end, start)
    }
}

/// A value animated from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Channel {
    pub start: f32,
    pub end: f32,
}

impl Channel {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn at(&self, progress: f32) -> f32 {
        interpolate(self.start, self.end, progress)
    }
}

/// Piecewise-constant labelling: the first break whose threshold exceeds
/// the input wins, otherwise the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFunction<L> {
    breaks: Vec<(f32, L)>,
    otherwise: L,
}

impl<L: Copy> StepFunction<L> {
    pub fn new(breaks: Vec<(f32, L)>, otherwise: L) -> Self {
        Self { breaks, otherwise }
    }

    pub fn eval(&self, x: f32) -> L {
        self.breaks
            .iter()
            .find(|(threshold, _)| x < *threshold)
            .map(|(_, label)| *label)
            .unwrap_or(self.otherwise)
    }
}

/// Landing phase shown in the HUD status field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandingStatus {
    Descent,
    Landing,
    Landed,
}

impl LandingStatus {
    pub const LANDING_AT: f32 = 0.7;
    pub const LANDED_AT: f32 = 0.9;

    pub fn steps() -> StepFunction<Self> {
        StepFunction::new(
            vec![
                (Self::LANDING_AT, Self::Descent),
                (Self::LANDED_AT, Self::Landing),
            ],
            Self::Landed,
        )
    }

    pub fn from_progress(progress: f32) -> Self {
        Self::steps().eval(progress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descent => "DESCENT",
            Self::Landing => "LANDING",
            Self::Landed => "LANDED",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Landed => Color::GREEN,
            _ => palette::HUD,
        }
    }
}

impl fmt::Display for LandingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flight phase for the orbital HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionPhase {
    Launch,
    Orbit,
}

impl MissionPhase {
    /// `Launch` until `orbit_at`, `Orbit` from then on
    pub fn from_progress(progress: f32, orbit_at: f32) -> Self {
        StepFunction::new(vec![(orbit_at, Self::Launch)], Self::Orbit).eval(progress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Launch => "LAUNCH",
            Self::Orbit => "ORBIT",
        }
    }
}

impl fmt::Display for MissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of the remaining propellant, judged on the displayed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelLevel {
    Critical,
    Warning,
    Nominal,
}

impl FuelLevel {
    pub const CRITICAL_BELOW: f32 = 10.0;
    pub const WARNING_BELOW: f32 = 15.0;

    pub fn from_value(fuel: f32) -> Self {
        StepFunction::new(
            vec![
                (Self::CRITICAL_BELOW, Self::Critical),
                (Self::WARNING_BELOW, Self::Warning),
            ],
            Self::Nominal,
        )
        .eval(fuel)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Nominal => "nominal",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Critical => Color::RED,
            Self::Warning => Color::YELLOW,
            Self::Nominal => Color::WHITE,
        }
    }
}

impl fmt::Display for FuelLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer with `,` between thousands groups
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Descent profile for the Mars landing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LandingTelemetry {
    /// metres
    pub altitude: Channel,
    /// m/s
    pub velocity: Channel,
    /// percent
    pub fuel: Channel,
    /// progress after which the retro-rockets fire
    pub retro_after: f32,
}

impl Default for LandingTelemetry {
    fn default() -> Self {
        Self {
            altitude: Channel::new(1200.0, 0.0),
            velocity: Channel::new(45.0, 0.0),
            fuel: Channel::new(23.0, 5.0),
            retro_after: 0.3,
        }
    }
}

impl LandingTelemetry {
    pub fn at(&self, progress: f32) -> LandingReadout {
        let fuel = self.fuel.at(progress);
        LandingReadout {
            altitude: self.altitude.at(progress),
            velocity: self.velocity.at(progress),
            fuel,
            status: LandingStatus::from_progress(progress),
            fuel_level: FuelLevel::from_value(fuel),
            retro_active: progress > self.retro_after,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LandingReadout {
    pub altitude: f32,
    pub velocity: f32,
    pub fuel: f32,
    pub status: LandingStatus,
    pub fuel_level: FuelLevel,
    pub retro_active: bool,
}

impl LandingReadout {
    pub fn altitude_text(&self) -> String {
        format!("{} m", self.altitude as i64)
    }

    pub fn velocity_text(&self) -> String {
        format!("{:.1} m/s", self.velocity)
    }

    pub fn fuel_text(&self) -> String {
        format!("{:.0}%", self.fuel)
    }
}

impl fmt::Display for LandingReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ALT     {}", self.altitude_text())?;
        writeln!(f, "VEL     {}", self.velocity_text())?;
        writeln!(f, "FUEL    {} ({})", self.fuel_text(), self.fuel_level)?;
        write!(f, "STATUS  {}", self.status)
    }
}

/// One animated stretch of the orbital flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitLeg {
    /// km
    pub altitude: Channel,
    /// km/s
    pub velocity: Channel,
    /// mission elapsed time, s
    pub clock: Channel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitTelemetry {
    pub legs: Vec<OrbitLeg>,
    /// progress at which the status flips from LAUNCH to ORBIT
    pub orbit_at: f32,
}

impl Default for OrbitTelemetry {
    fn default() -> Self {
        Self {
            legs: vec![
                OrbitLeg {
                    altitude: Channel::new(500.0, 540.0),
                    velocity: Channel::new(7.3, 7.6),
                    clock: Channel::new(480.0, 540.0),
                },
                OrbitLeg {
                    altitude: Channel::new(540.0, 580.0),
                    velocity: Channel::new(7.6, 7.8),
                    clock: Channel::new(540.0, 720.0),
                },
            ],
            // The build-up scene opens already in orbit
            orbit_at: 0.0,
        }
    }
}

impl OrbitTelemetry {
    /// Readout for `leg` (clamped to the last leg) at `progress`
    pub fn at(&self, leg: usize, progress: f32) -> Option<OrbitReadout> {
        let leg = self.legs.get(leg.min(self.legs.len().saturating_sub(1)))?;
        Some(OrbitReadout {
            altitude: leg.altitude.at(progress),
            velocity: leg.velocity.at(progress),
            mission_time: leg.clock.at(progress),
            phase: MissionPhase::from_progress(progress, self.orbit_at),
        })
    }

    /// Values shown before the first leg starts
    pub fn initial(&self) -> Option<OrbitReadout> {
        self.at(0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitReadout {
    pub altitude: f32,
    pub velocity: f32,
    pub mission_time: f32,
    pub phase: MissionPhase,
}

impl OrbitReadout {
    pub fn altitude_text(&self) -> String {
        format!("{} km", group_thousands(self.altitude as i64))
    }

    pub fn velocity_text(&self) -> String {
        format!("{:.2} km/s", self.velocity)
    }

    pub fn time_text(&self) -> String {
        format!("{:.1} s", self.mission_time)
    }
}

impl fmt::Display for OrbitReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ALT     {}", self.altitude_text())?;
        writeln!(f, "VEL     {}", self.velocity_text())?;
        writeln!(f, "T+      {}", self.time_text())?;
        write!(f, "STATUS  {}", self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints() {
        for (start, end) in [(0.0, 1.0), (1200.0, 0.0), (23.0, 5.0), (0.1, 0.3), (7.3, 7.6)] {
            assert_eq!(interpolate(start, end, 0.0), start);
            assert_eq!(interpolate(start, end, 1.0), end);
        }
    }

    #[test]
    fn test_interpolate_midpoint() {
        assert_eq!(interpolate(1200.0, 0.0, 0.5), 600.0);
        assert_eq!(interpolate(480.0, 540.0, 0.5), 510.0);
    }

    #[test]
    fn test_interpolate_monotonic() {
        let steps = 1000;
        for (start, end) in [(0.0f32, 1.0f32), (500.0, 540.0), (7.6, 7.8)] {
            let mut prev = interpolate(start, end, 0.0);
            for i in 1..=steps {
                let value = interpolate(start, end, i as f32 / steps as f32);
                assert!(value >= prev, "{} < {} at step {}", value, prev, i);
                assert!(value <= end);
                prev = value;
            }
        }

        // Decreasing channel is anti-monotonic
        let mut prev = interpolate(45.0, 0.0, 0.0);
        for i in 1..=steps {
            let value = interpolate(45.0, 0.0, i as f32 / steps as f32);
            assert!(value <= prev);
            assert!(value >= 0.0);
            prev = value;
        }
    }

    #[test]
    fn test_interpolate_is_repeatable() {
        let a = interpolate(23.0, 5.0, 0.37);
        let b = interpolate(23.0, 5.0, 0.37);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_landing_status_steps() {
        assert_eq!(LandingStatus::from_progress(0.0), LandingStatus::Descent);
        assert_eq!(LandingStatus::from_progress(0.5).as_str(), "DESCENT");
        assert_eq!(LandingStatus::from_progress(0.7).as_str(), "LANDING");
        assert_eq!(LandingStatus::from_progress(0.75).as_str(), "LANDING");
        assert_eq!(LandingStatus::from_progress(0.9).as_str(), "LANDED");
        assert_eq!(LandingStatus::from_progress(0.95).as_str(), "LANDED");
        assert_eq!(LandingStatus::from_progress(1.0), LandingStatus::Landed);
    }

    #[test]
    fn test_fuel_level_steps() {
        assert_eq!(FuelLevel::from_value(9.0).as_str(), "critical");
        assert_eq!(FuelLevel::from_value(10.0), FuelLevel::Warning);
        assert_eq!(FuelLevel::from_value(12.0).as_str(), "warning");
        assert_eq!(FuelLevel::from_value(15.0), FuelLevel::Nominal);
        assert_eq!(FuelLevel::from_value(20.0).as_str(), "nominal");
        assert_eq!(FuelLevel::Critical.color(), Color::RED);
    }

    #[test]
    fn test_mission_phase() {
        assert_eq!(MissionPhase::from_progress(0.2, 0.5), MissionPhase::Launch);
        assert_eq!(MissionPhase::from_progress(0.5, 0.5), MissionPhase::Orbit);
        assert_eq!(MissionPhase::from_progress(0.0, 0.0), MissionPhase::Orbit);
    }

    #[test]
    fn test_landing_readout() {
        let telemetry = LandingTelemetry::default();

        let start = telemetry.at(0.0);
        assert_eq!(start.altitude_text(), "1200 m");
        assert_eq!(start.velocity_text(), "45.0 m/s");
        assert_eq!(start.fuel_text(), "23%");
        assert_eq!(start.fuel_level, FuelLevel::Nominal);
        assert!(!start.retro_active);

        let end = telemetry.at(1.0);
        assert_eq!(end.altitude_text(), "0 m");
        assert_eq!(end.fuel, 5.0);
        assert_eq!(end.fuel_level, FuelLevel::Critical);
        assert_eq!(end.status, LandingStatus::Landed);
        assert!(end.retro_active);

        // 23 - 0.5 * 18 = 14 -> warning
        assert_eq!(telemetry.at(0.5).fuel_level, FuelLevel::Warning);
    }

    #[test]
    fn test_orbit_readout() {
        let telemetry = OrbitTelemetry::default();

        let initial = telemetry.initial().unwrap();
        assert_eq!(initial.altitude_text(), "500 km");
        assert_eq!(initial.velocity_text(), "7.30 km/s");
        assert_eq!(initial.time_text(), "480.0 s");
        assert_eq!(initial.phase, MissionPhase::Orbit);

        let end = telemetry.at(1, 1.0).unwrap();
        assert_eq!(end.altitude, 580.0);
        assert_eq!(end.mission_time, 720.0);

        // Out-of-range legs clamp to the last one
        assert_eq!(telemetry.at(7, 1.0), Some(end));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(580), "580");
        assert_eq!(group_thousands(1200), "1,200");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-4500), "-4,500");
    }

    #[test]
    fn test_readout_display() {
        let text = LandingTelemetry::default().at(0.75).to_string();
        assert!(text.contains("LANDING"));
        assert!(text.contains("ALT"));
    }
}
