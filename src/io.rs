// io.rs
// Saving and loading scenes: settings, spawner template and the particle graph

use crate::profile_scope;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use crate::config::SimConfig;
use crate::conversion::{to_builders, to_particles, ParticleBuilder, Spawner};
use crate::simulation::SimulationState;

/// On-disk layout of a scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedScene {
    #[serde(rename = "sim-settings")]
    pub settings: SimConfig,
    #[serde(rename = "particle-settings", default)]
    pub spawner: Spawner,
    #[serde(default)]
    pub particles: Vec<ParticleBuilder>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveFormat {
    #[default]
    Json,
    Binary,
}

fn invalid_data(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
}

impl SavedScene {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            settings: state.config.clone(),
            spawner: state.spawner.clone(),
            particles: to_builders(state.particles()),
        }
    }

    /// Replace the settings and every particle of `state`. Nothing is touched
    /// unless the whole scene is valid. Returns the number of particles loaded.
    pub fn apply_to(self, state: &mut SimulationState) -> std::io::Result<usize> {
        self.settings.validate().map_err(invalid_data)?;
        self.spawner.validate().map_err(invalid_data)?;
        if let Some(p) = self.particles.iter().find(|p| !(p.properties.mass > 0.0)) {
            return Err(invalid_data(format!("particle mass must be positive, got {}", p.properties.mass)));
        }
        state.clear();
        let applied = state.set_config(self.settings) & state.set_spawner(self.spawner);
        debug_assert!(applied, "settings and spawner were validated above");
        let ids = state.register_all(to_particles(&self.particles)).map_err(invalid_data)?;
        log::info!("loaded scene with {} particle(s)", ids.len());
        Ok(ids.len())
    }
}

/// Write the scene through a temporary file that is renamed over `path`.
pub fn save_scene<P: AsRef<Path>>(
    path: P,
    scene: &SavedScene,
    format: SaveFormat,
    compress: bool,
) -> std::io::Result<()> {
    profile_scope!("save_scene");
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension({
        let mut os = path.extension().map(|e| e.to_os_string()).unwrap_or_default();
        os.push(".tmp");
        os
    });
    {
        let file = std::fs::File::create(&tmp_path)?;
        let writer = BufWriter::new(file);
        match (format, compress) {
            (SaveFormat::Json, false) => {
                serde_json::to_writer(writer, scene).map_err(invalid_data)?;
            }
            (SaveFormat::Json, true) => {
                let mut encoder = GzEncoder::new(writer, Compression::fast());
                serde_json::to_writer(&mut encoder, scene).map_err(invalid_data)?;
                let mut writer = encoder.finish()?;
                writer.flush()?;
            }
            (SaveFormat::Binary, false) => {
                bincode::serialize_into(writer, scene).map_err(invalid_data)?;
            }
            (SaveFormat::Binary, true) => {
                let mut encoder = GzEncoder::new(writer, Compression::fast());
                bincode::serialize_into(&mut encoder, scene).map_err(invalid_data)?;
                let mut writer = encoder.finish()?;
                writer.flush()?;
            }
        }
    }
    std::fs::rename(&tmp_path, path)?;
    log::info!("saved {} particle(s) to {}", scene.particles.len(), path.display());
    Ok(())
}

/// Read a scene written by [`save_scene`] in any format, gzipped or not.
pub fn load_scene<P: AsRef<Path>>(path: P) -> std::io::Result<SavedScene> {
    profile_scope!("load_scene");
    let data = std::fs::read(path.as_ref())?;
    match maybe_decompress_gzip(&data)? {
        Some(decoded) => parse_scene_bytes(&decoded),
        None => parse_scene_bytes(&data),
    }
}

fn parse_scene_bytes(bytes: &[u8]) -> std::io::Result<SavedScene> {
    if let Ok(scene) = serde_json::from_slice::<SavedScene>(bytes) {
        return Ok(scene);
    }
    if let Ok(scene) = bincode::deserialize::<SavedScene>(bytes) {
        return Ok(scene);
    }
    Err(invalid_data("not a JSON or binary scene"))
}

fn maybe_decompress_gzip(data: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
    if data.len() < 2 || data[0] != 0x1f || data[1] != 0x8b {
        return Ok(None);
    }
    let mut decoder = GzDecoder::new(Cursor::new(data));
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Some(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{Particle, ParticleProperties};
    use ultraviolet::DVec2;

    fn scene_state() -> SimulationState {
        let mut state = SimulationState::new();
        let props = ParticleProperties { group: "walls".into(), locked: true, ..Default::default() };
        let a = state
            .register(Particle::new(DVec2::new(10.0, 20.0), DVec2::new(1.0, 0.0), 5.0, [1, 2, 3], props))
            .unwrap();
        let b = state
            .register(Particle::new(DVec2::new(30.0, 20.0), DVec2::zero(), 4.0, [4, 5, 6], ParticleProperties::default()))
            .unwrap();
        state.link(&[a, b], true, None);
        state
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("particle_playground_{}_{}", std::process::id(), name))
    }

    #[test]
    fn every_format_loads_back() {
        let scene = SavedScene::from_state(&scene_state());
        for (format, compress, name) in [
            (SaveFormat::Json, false, "plain.json"),
            (SaveFormat::Json, true, "packed.json.gz"),
            (SaveFormat::Binary, false, "plain.bin"),
            (SaveFormat::Binary, true, "packed.bin.gz"),
        ] {
            let path = temp_path(name);
            save_scene(&path, &scene, format, compress).unwrap();
            assert_eq!(load_scene(&path).unwrap(), scene);
            std::fs::remove_file(&path).unwrap();
        }
    }

    #[test]
    fn json_uses_section_names() {
        let scene = SavedScene::from_state(&scene_state());
        let text = serde_json::to_string(&scene).unwrap();
        assert!(text.contains("\"sim-settings\""));
        assert!(text.contains("\"particle-settings\""));
    }

    #[test]
    fn applying_a_scene_rebuilds_groups_and_links() {
        let scene = SavedScene::from_state(&scene_state());
        let mut state = SimulationState::new();
        assert_eq!(scene.apply_to(&mut state).unwrap(), 2);
        assert_eq!(state.group("walls").unwrap().members.len(), 1);
        let (a, b) = (&state.particles()[0], &state.particles()[1]);
        assert_eq!(a.rest_length(b.id()), Some(20.0));
        assert_eq!(b.rest_length(a.id()), Some(20.0));
    }

    #[test]
    fn invalid_scene_leaves_state_untouched() {
        let mut scene = SavedScene::from_state(&scene_state());
        scene.settings.air_res = 3.0;
        let mut state = scene_state();
        assert!(scene.apply_to(&mut state).is_err());
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn degenerate_spawner_rejects_the_whole_scene() {
        let mut scene = SavedScene::from_state(&scene_state());
        scene.particles.truncate(1);
        scene.spawner.template.radius = 0.0;
        let mut state = scene_state();
        let spawner_before = state.spawner.clone();

        let err = scene.apply_to(&mut state).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert_eq!(state.len(), 2);
        assert_eq!(state.spawner, spawner_before);
        assert!(state.drain_errors().is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        let path = temp_path("garbage.json");
        std::fs::write(&path, b"not a scene").unwrap();
        assert!(load_scene(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
