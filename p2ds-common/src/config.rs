//! Split configuration and config file resolution
//!
//! Everything the engine treats as fixed for a category (canonical segment
//! order, forced segments, minimum duration, display offset) is injected
//! through [`SplitConfig`]. The built-in defaults describe the Portal 2
//! single-player category.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "P2DS_CONFIG";

/// Upper bound for an authored forced-segment duration (one day)
pub const MAX_FORCED_SECS: f64 = 86_400.0;

/// Canonical Portal 2 single-player maps with their split names
const PORTAL2_SEGMENTS: [(&str, &str); 62] = [
    ("sp_a1_intro1", "-Container Ride"),
    ("sp_a1_intro2", "-Portal Carousel"),
    ("sp_a1_intro3", "-Portal Gun"),
    ("sp_a1_intro4", "-Smooth Jazz"),
    ("sp_a1_intro5", "-Cube Momentum"),
    ("sp_a1_intro6", "-Future Starter"),
    ("sp_a1_intro7", "-Secret Panel"),
    ("sp_a1_wakeup", "-Wakeup"),
    ("sp_a2_intro", "{Chapter 1} Incinerator"),
    ("sp_a2_laser_intro", "-Laser Intro"),
    ("sp_a2_laser_stairs", "-Laser Stairs"),
    ("sp_a2_dual_lasers", "-Dual Lasers"),
    ("sp_a2_laser_over_goo", "-Laser Over Goo"),
    ("sp_a2_catapult_intro", "-Catapult Intro"),
    ("sp_a2_trust_fling", "-Trust Fling"),
    ("sp_a2_pit_flings", "-Pit Flings"),
    ("sp_a2_fizzler_intro", "{Chapter 2} Fizzler Intro"),
    ("sp_a2_sphere_peek", "-Ceiling Catapult"),
    ("sp_a2_ricochet", "-Ricochet"),
    ("sp_a2_bridge_intro", "-Bridge Intro"),
    ("sp_a2_bridge_the_gap", "-Bridge the Gap"),
    ("sp_a2_turret_intro", "-Turret Intro"),
    ("sp_a2_laser_relays", "-Laser Relays"),
    ("sp_a2_turret_blocker", "-Turret Blocker"),
    ("sp_a2_laser_vs_turret", "-Laser vs. Turret"),
    ("sp_a2_pull_the_rug", "{Chapter 3} Pull the Rug"),
    ("sp_a2_column_blocker", "-Column Blocker"),
    ("sp_a2_laser_chaining", "-Laser Chaining"),
    ("sp_a2_triple_laser", "-Triple Laser"),
    ("sp_a2_bts1", "-Jailbreak"),
    ("sp_a2_bts2", "{Chapter 4} Escape"),
    ("sp_a2_bts3", "-Turret Factory"),
    ("sp_a2_bts4", "-Turret Sabotage"),
    ("sp_a2_bts5", "-Neurotoxin Sabotage"),
    ("sp_a2_bts6", "-Tube Ride"),
    ("sp_a2_core", "{Chapter 5} Core"),
    ("sp_a3_00", "-Long Fall"),
    ("sp_a3_01", "-Underground"),
    ("sp_a3_03", "-Cave Johnson"),
    ("sp_a3_jump_intro", "-Repulsion Intro"),
    ("sp_a3_bomb_flings", "-Bomb Flings"),
    ("sp_a3_crazy_box", "-Crazy Box"),
    ("sp_a3_transition01", "{Chapter 6} PotatOS"),
    ("sp_a3_speed_ramp", "-Prop Intro"),
    ("sp_a3_speed_flings", "-Prop Flings"),
    ("sp_a3_portal_intro", "-Conversion Intro"),
    ("sp_a3_end", "{Chapter 7} Three Gels"),
    ("sp_a4_intro", "-Test"),
    ("sp_a4_tb_intro", "-Funnel Intro"),
    ("sp_a4_tb_trust_drop", "-Ceiling Button"),
    ("sp_a4_tb_wall_button", "-Wall Button"),
    ("sp_a4_tb_polarity", "-Polarity"),
    ("sp_a4_tb_catch", "-Funnel Catch"),
    ("sp_a4_stop_the_box", "-Stop the Box"),
    ("sp_a4_laser_catapult", "-Laser Catapult"),
    ("sp_a4_laser_platform", "-Laser Platform"),
    ("sp_a4_speed_tb_catch", "-Prop Catch"),
    ("sp_a4_jump_polarity", "{Chapter 8} Repulsion Polarity"),
    ("sp_a4_finale1", "-Finale 1"),
    ("sp_a4_finale2", "-Finale 2"),
    ("sp_a4_finale3", "-Finale 3"),
    ("sp_a4_finale4", "{Chapter 9} Finale 4"),
];

/// Cutscene-driven maps whose completion cannot be detected from demos
const PORTAL2_FORCED: [(&str, f64); 2] = [("sp_a2_bts6", 51.867), ("sp_a3_00", 77.767)];

/// One canonical segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDef {
    /// Segment (map) id as reported by demos
    pub id: String,
    /// Split name in the LiveSplit document; falls back to the id
    #[serde(default)]
    pub name: String,
}

/// Segment that is always finished with an authored duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedSegment {
    pub id: String,
    /// Authored canonical duration in seconds
    pub seconds: f64,
}

/// Completion marker needles searched in demo console commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Needles that mark a finished segment
    pub completion: Vec<String>,
    /// Segment whose end is marked differently (no escape prompt)
    pub final_segment: Option<String>,
    /// Extra needles searched only in `final_segment` demos
    #[serde(rename = "final")]
    pub final_markers: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            completion: vec!["gameui_allowescapetoshow".to_string()],
            final_segment: Some("sp_a4_finale4".to_string()),
            final_markers: vec![
                "map_wants_save_disable".to_string(),
                "ent_fire prop_portal fizzle".to_string(),
                "hud_subtitles".to_string(),
            ],
        }
    }
}

impl MarkerConfig {
    /// Needles to search for in a demo recorded on `segment_id`
    pub fn needles_for(&self, segment_id: &str) -> Vec<&str> {
        let mut needles: Vec<&str> = self.completion.iter().map(String::as_str).collect();
        if self.final_segment.as_deref() == Some(segment_id) {
            needles.extend(self.final_markers.iter().map(String::as_str));
        }
        needles
    }
}

/// LiveSplit run variable (`<Variable name="...">value</Variable>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LssVariable {
    pub name: String,
    pub value: String,
}

/// Run header of the generated LiveSplit document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LssConfig {
    pub game_name: String,
    pub category_name: String,
    pub platform: String,
    /// `<Offset>` value, written verbatim
    pub header_offset: String,
    pub variables: Vec<LssVariable>,
}

impl Default for LssConfig {
    fn default() -> Self {
        Self {
            game_name: "Portal 2".to_string(),
            category_name: "Single Player".to_string(),
            platform: "PC".to_string(),
            header_offset: "00:05:16.3300000".to_string(),
            variables: vec![
                LssVariable {
                    name: "Quicksaves".to_string(),
                    value: "Yes".to_string(),
                },
                LssVariable {
                    name: "Singleplayer Category".to_string(),
                    value: "No SLA".to_string(),
                },
            ],
        }
    }
}

/// Injected configuration for the whole pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Canonical segment order
    pub segments: Vec<SegmentDef>,
    /// Forced segments and their authored durations
    pub forced: Vec<ForcedSegment>,
    /// Minimum raw duration for a finished segment / gold candidate
    pub min_duration_secs: f64,
    /// Added to cumulative and displayed times only
    pub display_offset_secs: f64,
    /// Demo files above this size are invalid records
    pub max_demo_size_mb: u64,
    /// Only files starting with this prefix belong to an attempt
    pub demo_prefix: String,
    pub markers: MarkerConfig,
    pub lss: LssConfig,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            segments: PORTAL2_SEGMENTS
                .iter()
                .map(|(id, name)| SegmentDef {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            forced: PORTAL2_FORCED
                .iter()
                .map(|(id, seconds)| ForcedSegment {
                    id: id.to_string(),
                    seconds: *seconds,
                })
                .collect(),
            min_duration_secs: 17.0,
            // 5:10.550
            display_offset_secs: 5.0 * 60.0 + 10.0 + 0.550,
            max_demo_size_mb: 10,
            demo_prefix: "fullgame_".to_string(),
            markers: MarkerConfig::default(),
            lss: LssConfig::default(),
        }
    }
}

impl SplitConfig {
    /// Parse and validate a TOML document; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SplitConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("Config file {}", path.display())));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(Error::Config("segment list is empty".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for segment in &self.segments {
            if segment.id.trim().is_empty() {
                return Err(Error::Config("segment with empty id".to_string()));
            }
            if !seen.insert(segment.id.as_str()) {
                return Err(Error::Config(format!("duplicate segment id {}", segment.id)));
            }
        }

        for forced in &self.forced {
            if !seen.contains(forced.id.as_str()) {
                return Err(Error::Config(format!(
                    "forced segment {} is not a canonical segment",
                    forced.id
                )));
            }
            if !forced.seconds.is_finite()
                || forced.seconds <= 0.0
                || forced.seconds > MAX_FORCED_SECS
            {
                return Err(Error::Config(format!(
                    "forced segment {} needs a duration in (0, {}] seconds, got {}",
                    forced.id, MAX_FORCED_SECS, forced.seconds
                )));
            }
        }

        if !self.min_duration_secs.is_finite() || self.min_duration_secs < 0.0 {
            return Err(Error::Config(format!(
                "min_duration_secs must be >= 0, got {}",
                self.min_duration_secs
            )));
        }

        if !self.display_offset_secs.is_finite() {
            return Err(Error::Config("display_offset_secs must be finite".to_string()));
        }

        Ok(())
    }

    /// Canonical segment ids in order
    pub fn canonical_ids(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.id.as_str())
    }

    pub fn is_canonical(&self, segment_id: &str) -> bool {
        self.segments.iter().any(|s| s.id == segment_id)
    }

    /// First canonical segment (carries the display offset in gold tables)
    pub fn first_segment(&self) -> Option<&str> {
        self.segments.first().map(|s| s.id.as_str())
    }

    /// Split name for a segment, falling back to its id
    pub fn segment_name<'a>(&'a self, segment_id: &'a str) -> &'a str {
        self.segments
            .iter()
            .find(|s| s.id == segment_id && !s.name.is_empty())
            .map(|s| s.name.as_str())
            .unwrap_or(segment_id)
    }

    pub fn is_forced(&self, segment_id: &str) -> bool {
        self.forced.iter().any(|f| f.id == segment_id)
    }

    /// Authored duration of a forced segment
    pub fn forced_seconds(&self, segment_id: &str) -> Option<f64> {
        self.forced
            .iter()
            .find(|f| f.id == segment_id)
            .map(|f| f.seconds)
    }

    pub fn max_demo_size_bytes(&self) -> u64 {
        self.max_demo_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// `--config` command-line argument
    CommandLine(PathBuf),
    /// `P2DS_CONFIG` environment variable
    Environment(PathBuf),
    /// `<user config dir>/p2ds/config.toml`
    UserFile(PathBuf),
    /// Compiled-in defaults
    Defaults,
}

/// Config file resolution following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. User config file, if it exists
/// 4. Compiled defaults (fallback)
pub fn resolve_config_source(cli_arg: Option<&Path>) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigSource::CommandLine(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return ConfigSource::Environment(PathBuf::from(path));
        }
    }

    // Priority 3: User config file
    if let Some(path) = user_config_file() {
        if path.exists() {
            return ConfigSource::UserFile(path);
        }
    }

    // Priority 4: Compiled defaults
    ConfigSource::Defaults
}

/// Resolve and load the configuration
///
/// Explicitly named files (argument or environment) must exist and parse.
pub fn load_config(cli_arg: Option<&Path>) -> Result<SplitConfig> {
    match resolve_config_source(cli_arg) {
        ConfigSource::CommandLine(path) | ConfigSource::Environment(path) => {
            info!("Loading config from {}", path.display());
            SplitConfig::load(&path)
        }
        ConfigSource::UserFile(path) => {
            info!("Loading user config from {}", path.display());
            SplitConfig::load(&path)
        }
        ConfigSource::Defaults => {
            info!("No config file found, using built-in Portal 2 defaults");
            Ok(SplitConfig::default())
        }
    }
}

fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir().map(|d| d.join("p2ds").join("config.toml"));
    if path.is_none() {
        warn!("Could not determine user config directory");
    }
    path
}
