pub mod config;
pub mod pipeline;
pub mod satellite;
pub mod stager;
pub mod testing;
pub mod tools;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, PathsConfig,
    PipelineConfig,
};
pub use pipeline::{ObservationReport, PipelineDriver, PipelineError, RunReport};
pub use satellite::{
    resolve, ChannelAssignment, ColorChannel, Dispatch, NoradId, ProfileRegistry, Resolution,
    ResolveError, SatelliteProfile, WaitPolicy,
};
pub use stager::{DirectoryLayout, FsStager, Observation, Retention, StagerConfig, StagerError};
pub use tools::{
    CompositeImages, Compositor, DecodeOutcome, Decoder, Demodulator, ImageMagick, Medet,
    MeteorDemod, ToolError, ToolsConfig,
};
