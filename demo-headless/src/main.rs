use std::sync::Arc;

use clap::Parser;
use gravity_field_core::{
    FalloffCurve, FieldMode, FieldReceiver, FieldRegistry, FieldSource, RadialProfile,
    SourcePlacement, Vec3,
};

/// Gravity field demo: flies a virtual hover vehicle past a planet and a
/// repulsor hazard, sampling the combined field each tick the same way the
/// in-game vehicle controller would.
#[derive(Parser, Debug)]
#[command(name = "gravity-field-demo")]
#[command(about = "Headless directional field sampling demo", long_about = None)]
struct Args {
    /// Simulated flight duration in seconds
    #[arg(short, long, default_value_t = 30.0)]
    duration: f32,

    /// Fixed timestep in seconds
    #[arg(short, long, default_value_t = 0.02)]
    timestep: f32,

    /// Receiver smoothing rate (1/s, 0 = snap)
    #[arg(short, long, default_value_t = 10.0)]
    smoothing: f32,

    /// Vehicle speed along the +x axis in m/s
    #[arg(long, default_value_t = 12.0)]
    speed: f32,

    /// Planet surface gravity in m/s^2
    #[arg(long, default_value_t = 9.81)]
    gravity: f32,

    /// Planet field radius in meters (0 = unbounded)
    #[arg(long, default_value_t = 120.0)]
    planet_radius: f32,

    /// Repulsor hazard strength in m/s^2
    #[arg(long, default_value_t = 25.0)]
    hazard_strength: f32,

    /// Repulsor hazard radius in meters
    #[arg(long, default_value_t = 30.0)]
    hazard_radius: f32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 1.0)]
    report_interval: f32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let registry = FieldRegistry::new();

    // A planet at the origin pulling the vehicle in, and a repulsor hazard
    // parked along the flight path pushing it away.
    let planet = Arc::new(
        RadialProfile::new(FieldMode::Attraction, args.planet_radius, args.gravity)
            .with_falloff(FalloffCurve::SmoothStep),
    );
    let _planet = registry.attach_source(
        FieldSource::new(planet).with_placement(SourcePlacement::at(Vec3::zeros())),
    );

    let hazard = Arc::new(
        RadialProfile::new(FieldMode::Repulsion, args.hazard_radius, args.hazard_strength)
            .with_falloff(FalloffCurve::Linear)
            .with_weight(2.0),
    );
    let _hazard = registry.attach_source(
        FieldSource::new(hazard).with_placement(SourcePlacement::at(Vec3::new(60.0, 20.0, 0.0))),
    );

    println!("=== Gravity Field Demo ===");
    println!(
        "planet: gravity {:.2} m/s^2, radius {:.0} m | hazard: strength {:.2}, radius {:.0} m",
        args.gravity, args.planet_radius, args.hazard_strength, args.hazard_radius
    );
    println!(
        "vehicle: speed {:.1} m/s, smoothing {:.1}/s, timestep {:.0} ms",
        args.speed,
        args.smoothing,
        args.timestep * 1000.0
    );
    println!();

    // The vehicle starts west of the planet at hover altitude and flies
    // east past the hazard.
    let start = Vec3::new(-100.0, 20.0, 0.0);
    let mut vehicle = FieldReceiver::attach_at(&registry, start, args.smoothing);

    let mut elapsed = 0.0_f32;
    let mut next_report = 0.0_f32;
    while elapsed < args.duration {
        let position = start + Vec3::new(args.speed * elapsed, 0.0, 0.0);
        vehicle.set_position(position);
        vehicle.sample_once(args.timestep);

        if elapsed >= next_report {
            report(elapsed, &vehicle);
            next_report += args.report_interval;
        }
        elapsed += args.timestep;
    }

    report(elapsed, &vehicle);
    println!();
    println!(
        "done: {} sources, {} receiver(s), registry generation {}",
        registry.source_count(),
        registry.receiver_count(),
        registry.generation()
    );
}

fn report(elapsed: f32, vehicle: &FieldReceiver) {
    let position = vehicle.position();
    let force = vehicle.last_force();
    let up = vehicle.last_up();
    let state = if vehicle.has_field() { "field" } else { "  no " };
    println!(
        "t={elapsed:6.2}s [{state}] pos=({:7.1},{:5.1},{:5.1}) force=({:6.2},{:6.2},{:6.2}) |f|={:5.2} up=({:5.2},{:5.2},{:5.2})",
        position.x, position.y, position.z,
        force.x, force.y, force.z,
        force.norm(),
        up.x, up.y, up.z
    );
}
