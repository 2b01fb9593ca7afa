//! Two peers run in lockstep until the client's door list drifts, the
//! per-turn checksum check catches it, and the host's history is shipped
//! over the wire and compared.
//!
//! Run with `RUST_LOG=lockstep=debug` to see every stored turn.

use lockstep_core::{GameTurn, PlayerId, SimulationWorld, ThingCategory};
use lockstep_desync::{payload_from_bytes, payload_to_bytes, DesyncDiagnostics, DesyncOutcome};
use lockstep_test_utils::fixtures::{agreeing_exchange, random_world};
use tracing_subscriber::EnvFilter;

const DRIFT_TURN: u32 = 70;
const TURNS: u32 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut host_world = random_world(2024, 200);
    let mut client_world = host_world.clone();
    let mut host = DesyncDiagnostics::new();
    let mut client = DesyncDiagnostics::new();

    for _ in 0..TURNS {
        let turn = host_world.current_turn();
        if turn == GameTurn(DRIFT_TURN) {
            let door = client_world.thing_list_head(ThingCategory::Doors);
            if !door.is_none() {
                client_world.thing_mut(door).health -= 1;
            }
        }

        let host_sum = host.on_turn_simulated(&host_world);
        let client_sum = client.on_turn_simulated(&client_world);

        let mut packets = agreeing_exchange(turn, host_sum);
        packets[1].checksum = client_sum;
        host.on_packets_exchanged(turn, &packets, PlayerId(0));
        client.on_packets_exchanged(turn, &packets, PlayerId(1));

        let verdict = client.verify_turn_checksums(&client_world, &packets, PlayerId(0));
        if verdict.is_mismatch() {
            tracing::info!("desync detected on turn {turn}, requesting resync");
            break;
        }
        host_world.step();
        client_world.step();
    }

    let bytes = payload_to_bytes(&host.prepare_resync())?;
    tracing::info!("resync payload is {} bytes", bytes.len());
    let mut payload = payload_from_bytes(&bytes, client.checksum_history().depth())?;

    match client.analyze_resync(&client_world, &mut payload) {
        DesyncOutcome::Analyzed(report) => {
            for cmp in report.mismatches() {
                tracing::info!(
                    "{} differs at turn {}: client {:08x} host {:08x}",
                    cmp.field,
                    report.target_turn,
                    cmp.client,
                    cmp.host,
                );
            }
        }
        other => tracing::info!("no comparison made: {other:?}"),
    }
    Ok(())
}
