//! citygrid — end-to-end rust_nav demo.
//!
//! Plans a cross-town route on a synthetic street grid, races both search
//! engines, then drives the route in accelerated time.  Midway, an obstacle
//! appears ahead of the vehicle: the simulation freezes short of it, a
//! background reroute excludes the blocked block, and the replacement route
//! is spliced in without teleporting the vehicle.

mod network;

use std::thread;
use std::time::Duration;

use anyhow::Result;

use nav_core::ScenarioProfiles;
use nav_graph::{FixedRegionProvider, SearchQuery, race};
use nav_route::{LatLng, PathRequest, PlannerConfig, RoutePlanner};
use nav_sim::{
    BackgroundPlanner, InjectOutcome, SimTuning, Simulation, TickEvent,
};

use network::build_network;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Wall seconds advanced per loop iteration (synthetic clock).
const WALL_STEP_S: f64 = 1.0;
/// Sim-time runs this much faster than the synthetic wall clock.
const SPEED_MULTIPLIER: f64 = 4.0;
/// Wall time at which the road ahead closes.
const OBSTACLE_WALL_S: f64 = 30.0;
const OBSTACLE_AHEAD_M: f64 = 700.0;

/// Deployment-style scenario profile config (normally a file on disk).
const PROFILES_JSON: &str = r#"{
    "routine": 1.0,
    "trauma": 1.05,
    "cardiac_arrest": 1.1
}"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== citygrid — rust_nav demo ===");

    // 1. Road graph.
    let (graph, nodes) = build_network();
    println!(
        "Street grid: {} nodes, {} directed edges",
        graph.node_count(),
        graph.edge_count()
    );

    // 2. Race the two engines corner to corner before planning.
    let src = nodes[0][0];
    let dst = nodes[network::GRID - 1][network::GRID - 1];
    let report = race(&graph, &SearchQuery::new(src, dst).with_trace(10_000));
    for entry in [&report.baseline, &report.alternate] {
        let outcome = entry.outcome.as_ref().expect("grid is connected");
        println!(
            "  {:<9} {:>8.1} m  {:>7.3} ms  {:>5} edges examined",
            entry.algorithm.tag(),
            outcome.cost_m,
            entry.elapsed_ms,
            entry.examined(),
        );
    }
    println!(
        "  cost gap: {:.6} m",
        report.cost_gap_m().expect("both engines routed")
    );

    // 3. Planner over a fixed region, profiles from config.
    let profiles: ScenarioProfiles = serde_json::from_str(PROFILES_JSON)?;
    profiles.validate()?;
    let start = LatLng::from(graph.node_pos[src.index()]);
    let end = LatLng::from(graph.node_pos[dst.index()]);
    // Closure radius wide enough that any mid-block obstacle still catches
    // its nearest intersection (blocks are 300 m).
    let planner_config = PlannerConfig { block_radius_m: 160.0, ..Default::default() };
    let planner = RoutePlanner::new(
        FixedRegionProvider::from_graph(graph),
        profiles,
        planner_config,
    );

    let mut request = PathRequest::new(start, end);
    request.scenario = nav_core::Scenario::CardiacArrest;
    let planned = planner.plan_meta(&request)?;
    println!(
        "\nRoute: {:.0} m, {:.0} s ETA, {} steps ({} in {:.3} ms)",
        planned.meta.total_distance_m,
        planned.meta.total_time_s,
        planned.meta.steps.len(),
        planned.meta.algorithm,
        planned.execution_time_ms,
    );
    for step in &planned.meta.steps {
        println!(
            "    {:>6.0} m  {}",
            step.start_distance_m, step.instruction
        );
    }

    // 4. Simulation at accelerated wall time; the planner moves to a worker
    //    thread for background reroutes.
    // Stand-off well clear of the closure radius so the freeze point snaps
    // to an intersection that still has open ways out.
    let tuning = SimTuning { standoff_m: 400.0, ..Default::default() };
    let mut sim = Simulation::start(planned.meta, request, tuning, SPEED_MULTIPLIER, 0.0)?;
    let background = BackgroundPlanner::spawn(planner);

    println!("\nDriving (sim-time x{SPEED_MULTIPLIER}):");
    let mut wall = 0.0_f64;
    let mut obstacle_pending = true;
    let summary = loop {
        wall += WALL_STEP_S;
        // Give the worker a moment, as a UI frame loop would.
        thread::sleep(Duration::from_millis(5));

        // 5. Deliver any finished background reroute.
        if let Some((id, result)) = background.poll() {
            let outcome = sim.complete_reroute(id, result);
            println!("  [reroute {id:?}] {outcome:?}");
        }

        // 6. Mid-drive road closure.
        if obstacle_pending && wall >= OBSTACLE_WALL_S {
            obstacle_pending = false;
            match sim.inject_obstacle(wall, OBSTACLE_AHEAD_M) {
                InjectOutcome::Frozen(ticket) => {
                    println!(
                        "  !! road closed {OBSTACLE_AHEAD_M:.0} m ahead — request {} issued",
                        ticket.id
                    );
                    background.submit(ticket);
                }
                other => println!("  !! obstacle ignored: {other:?}"),
            }
        }

        match sim.tick(wall) {
            TickEvent::Live(state) => {
                if wall as u64 % 10 == 0 {
                    println!(
                        "  t={:>5.0}s  {:>6.0} m  on {:<12} next: {} ({:.0} m){}",
                        state.sim_time_s,
                        state.distance_m,
                        state.current_street,
                        state.next_instruction,
                        state.distance_to_next_maneuver_m,
                        if state.frozen { "  [FROZEN]" } else { "" },
                    );
                }
            }
            TickEvent::Arrived(summary) => break summary,
            TickEvent::Retired => unreachable!("tick after arrival"),
        }
    };

    // 7. Summary.
    println!(
        "\nArrived: {:.0} m driven in {:.0} s sim-time ({:.0} s wall)",
        summary.total_distance_m, summary.trip_time_s, wall
    );
    Ok(())
}
