use std::path::PathBuf;

use derive_builder::Builder;

use crate::error::Error;

/// Parsed configuration for one multiplication run.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "Error"))]
pub struct RunConfig {
    #[builder(setter(into))]
    pub input_a: PathBuf,
    #[builder(setter(into))]
    pub input_b: PathBuf,
    /// Number of worker threads, at least 1
    pub threads: usize,
    /// Where to persist the result. `None` computes and discards it.
    #[builder(setter(into, strip_option), default)]
    pub output: Option<PathBuf>,
}

impl RunConfigBuilder {
    fn validate(&self) -> Result<(), Error> {
        for (name, path) in [("input_a", &self.input_a), ("input_b", &self.input_b)] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(Error::InvalidConfiguration(format!("`{name}` is empty")));
            }
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidConfiguration(
                "thread count must be positive".into(),
            ));
        }
        Ok(())
    }
}
