//! Host/client desync comparison.
//!
//! Given the local checksum ring and the host's packed history, find the
//! turn both sides should have recorded and diff the two snapshots field
//! by field. Everything is logged on the `lockstep::desync` target and
//! also returned as a [`DesyncOutcome`].

use std::fmt;

use lockstep_core::{count_things, Checksum, GameTurn, SimulationWorld, ThingCategory};
use lockstep_history::{ChecksumHistoryRing, ChecksumSnapshot};

use crate::payload::DesyncDiagnosticsPayload;

// ── Fields ──────────────────────────────────────────────────────

/// One compared quantity of a [`ChecksumSnapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChecksumField {
    /// The per-turn checksum stamped on packets.
    TurnChecksum,
    /// Sum over all thing categories.
    Things,
    /// One thing category.
    Category(ThingCategory),
    /// Sum over rooms.
    Rooms,
    /// Sum over player slots.
    Players,
    /// Gameplay action RNG.
    ActionSeed,
    /// Computer player RNG.
    AiSeed,
    /// Player-visible RNG.
    PlayerSeed,
}

impl ChecksumField {
    /// Label used in the log.
    pub fn label(self) -> &'static str {
        match self {
            Self::TurnChecksum => "Turn Checksum",
            Self::Things => "Things",
            Self::Category(category) => category.label(),
            Self::Rooms => "Rooms",
            Self::Players => "Players",
            Self::ActionSeed => "GAME_RANDOM seed",
            Self::AiSeed => "AI_RANDOM seed",
            Self::PlayerSeed => "PLAYER_RANDOM seed",
        }
    }

    /// Read this field from a snapshot.
    pub fn value(self, snap: &ChecksumSnapshot) -> Checksum {
        match self {
            Self::TurnChecksum => snap.turn_checksum,
            Self::Things => snap.things_sum,
            Self::Category(category) => snap.category_sum(category),
            Self::Rooms => snap.rooms_sum,
            Self::Players => snap.players_sum,
            Self::ActionSeed => snap.action_random_seed,
            Self::AiSeed => snap.ai_random_seed,
            Self::PlayerSeed => snap.player_random_seed,
        }
    }
}

impl fmt::Display for ChecksumField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Client and host values of one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChecksumComparison {
    /// What was compared.
    pub field: ChecksumField,
    /// Local value.
    pub client: Checksum,
    /// Host value.
    pub host: Checksum,
}

impl ChecksumComparison {
    fn of(field: ChecksumField, client: &ChecksumSnapshot, host: &ChecksumSnapshot) -> Self {
        Self {
            field,
            client: field.value(client),
            host: field.value(host),
        }
    }

    /// Whether both sides agree.
    pub fn is_match(&self) -> bool {
        self.client == self.host
    }

    fn log(&self) {
        let status = if self.is_match() { "match" } else { "MISMATCH" };
        tracing::error!(
            target: "lockstep::desync",
            "    {} {} - Client: {:08x}, Host: {:08x}",
            self.field,
            status,
            self.client,
            self.host,
        );
    }
}

// ── Census ──────────────────────────────────────────────────────

/// Live thing counts per category on the client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThingCensus {
    counts: [usize; ThingCategory::COUNT],
}

impl ThingCensus {
    /// Count every category list of `world`.
    pub fn take(world: &dyn SimulationWorld) -> Self {
        Self {
            counts: ThingCategory::ALL.map(|category| count_things(world, category)),
        }
    }

    /// Things in one category.
    pub fn count(&self, category: ThingCategory) -> usize {
        self.counts[category.index()]
    }

    /// Things across all categories.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for ThingCensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in ThingCategory::ALL {
            write!(f, "{}:{} ", category, self.count(category))?;
        }
        write!(f, "Total:{}", self.total())
    }
}

// ── Report ──────────────────────────────────────────────────────

/// Field-by-field diff of one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesyncReport {
    /// Local turn at analysis time.
    pub client_turn: GameTurn,
    /// Highest turn in the host's history.
    pub host_turn: GameTurn,
    /// Turn whose snapshots were compared.
    pub target_turn: GameTurn,
    /// Turn at which a packet checksum mismatch was last seen locally.
    pub detected_turn: Option<GameTurn>,
    /// Client thing counts before the comparison.
    pub census: ThingCensus,
    /// Every comparison, in log order.
    pub comparisons: Vec<ChecksumComparison>,
}

impl DesyncReport {
    /// Comparisons that disagree.
    pub fn mismatches(&self) -> impl Iterator<Item = &ChecksumComparison> {
        self.comparisons.iter().filter(|c| !c.is_match())
    }

    /// Fields that disagree, in log order.
    pub fn mismatched_fields(&self) -> Vec<ChecksumField> {
        self.mismatches().map(|c| c.field).collect()
    }

    /// The comparison of `field`, if it was made.
    pub fn comparison(&self, field: ChecksumField) -> Option<&ChecksumComparison> {
        self.comparisons.iter().find(|c| c.field == field)
    }

    /// Per-category comparisons. Empty unless the things sum disagreed.
    pub fn category_breakdown(&self) -> impl Iterator<Item = &ChecksumComparison> {
        self.comparisons
            .iter()
            .filter(|c| matches!(c.field, ChecksumField::Category(_)))
    }

    /// Whether every compared field agrees.
    pub fn is_clean(&self) -> bool {
        self.comparisons.iter().all(ChecksumComparison::is_match)
    }
}

/// Result of one comparison attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DesyncOutcome {
    /// The payload carried no diagnostics, or they were already used.
    MissingPayload,
    /// One side no longer retains the target turn. Points at a lost or
    /// late packet rather than simulation divergence.
    NoHistory {
        /// Local turn at analysis time.
        client_turn: GameTurn,
        /// Highest turn in the host's history.
        host_turn: GameTurn,
        /// Turn that was looked up.
        target_turn: GameTurn,
        /// Whether the local ring had the target turn.
        client_found: bool,
        /// Whether the host history had the target turn.
        host_found: bool,
    },
    /// Both sides had the target turn.
    Analyzed(DesyncReport),
}

impl DesyncOutcome {
    /// The report, if a comparison was made.
    pub fn report(&self) -> Option<&DesyncReport> {
        match self {
            Self::Analyzed(report) => Some(report),
            _ => None,
        }
    }
}

// ── Comparison ──────────────────────────────────────────────────

/// Compare the local ring against the host's packed history.
///
/// The target turn is the lower of the local current turn and the
/// host's highest recorded turn. If either side lacks it, the "no
/// history" path is logged. Otherwise the turn checksum and things sum
/// are compared, the eight categories only if the things sum differs,
/// then rooms, players and the three seeds.
///
/// Always clears `payload.has_desync_diagnostics`.
pub fn compare_desync_history_from_host(
    world: &dyn SimulationWorld,
    local: &ChecksumHistoryRing,
    payload: &mut DesyncDiagnosticsPayload,
) -> DesyncOutcome {
    compare_with_detected_turn(world, local, payload, None)
}

pub(crate) fn compare_with_detected_turn(
    world: &dyn SimulationWorld,
    local: &ChecksumHistoryRing,
    payload: &mut DesyncDiagnosticsPayload,
    detected_turn: Option<GameTurn>,
) -> DesyncOutcome {
    if !payload.has_desync_diagnostics {
        tracing::error!(
            target: "lockstep::desync",
            "No desync diagnostics attached to resync, nothing to compare",
        );
        return DesyncOutcome::MissingPayload;
    }
    payload.has_desync_diagnostics = false;

    let client_turn = world.current_turn();
    let host_turn = payload.host_current_turn().unwrap_or_default();
    let target_turn = client_turn.min(host_turn);

    let client_entry = local.find(target_turn);
    let host_entry = payload.find(target_turn);
    let (Some(client), Some(host)) = (client_entry, host_entry) else {
        tracing::error!(
            target: "lockstep::desync",
            "No desync history found for turn {target_turn}, so the cause of the desync was \
             likely a packet not being received, which means the input lag was set too low",
        );
        return DesyncOutcome::NoHistory {
            client_turn,
            host_turn,
            target_turn,
            client_found: client_entry.is_some(),
            host_found: host_entry.is_some(),
        };
    };

    let report = analyze(world, client, host, client_turn, host_turn, detected_turn);
    DesyncOutcome::Analyzed(report)
}

fn analyze(
    world: &dyn SimulationWorld,
    client: &ChecksumSnapshot,
    host: &ChecksumSnapshot,
    client_turn: GameTurn,
    host_turn: GameTurn,
    detected_turn: Option<GameTurn>,
) -> DesyncReport {
    tracing::error!(
        target: "lockstep::desync",
        "=== DESYNC ANALYSIS: Client (turn {client_turn}) vs Host (turn {host_turn}) ===",
    );
    if let Some(turn) = detected_turn {
        tracing::error!(target: "lockstep::desync", "Checksum mismatch first seen on turn {turn}");
    }

    let census = ThingCensus::take(world);
    tracing::error!(
        target: "lockstep::desync",
        "Things count by category (pre-resync): {census}",
    );

    let mut comparisons = Vec::with_capacity(7 + ThingCategory::COUNT);
    let mut record = |field| {
        let cmp = ChecksumComparison::of(field, client, host);
        cmp.log();
        comparisons.push(cmp);
        cmp
    };

    record(ChecksumField::TurnChecksum);
    if !record(ChecksumField::Things).is_match() {
        tracing::error!(target: "lockstep::desync", "  Breaking down THINGS MISMATCH by category:");
        for category in ThingCategory::ALL {
            record(ChecksumField::Category(category));
        }
    }
    for field in [
        ChecksumField::Rooms,
        ChecksumField::Players,
        ChecksumField::ActionSeed,
        ChecksumField::AiSeed,
        ChecksumField::PlayerSeed,
    ] {
        record(field);
    }

    tracing::error!(target: "lockstep::desync", "=== END DESYNC ANALYSIS ===");

    DesyncReport {
        client_turn,
        host_turn,
        target_turn: client.turn,
        detected_turn,
        census,
        comparisons,
    }
}
