//! Test helpers for writing reference snapshots and stubbing the geocoder.

use super::*;
use crate::evaluate::{EvaluateConfig, GeocoderBuilder};
use camino::{Utf8Path, Utf8PathBuf};
use placewell_core::test_support::{ScriptedGeocoder, ScriptedResponse, sample_tables};
use placewell_core::GeocodingProvider;
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Temporary directory holding a reference snapshot.
pub(super) struct SnapshotDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl SnapshotDir {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write the sample reference tables and return the snapshot path.
    pub(super) fn write_sample(&self) -> Utf8PathBuf {
        let path = self.path("reference.json");
        let payload = serde_json::to_vec_pretty(&sample_tables()).expect("serialise tables");
        write_utf8(&path, &payload);
        path
    }
}

/// Builder handing out a scripted geocoder instead of Nominatim.
#[derive(Debug)]
pub(super) struct ScriptedGeocoderBuilder {
    pub(super) response: ScriptedResponse,
}

impl GeocoderBuilder for ScriptedGeocoderBuilder {
    fn build(&self, _config: &EvaluateConfig) -> Result<Box<dyn GeocodingProvider>, CliError> {
        Ok(Box::new(ScriptedGeocoder::always(self.response.clone())))
    }
}
