//! `Config.txt` parsing: the eight integer knobs that parameterize a timing
//! run (queue depths, bank count, pipeline depths, lane count).

use crate::error::ConfigError;
use std::collections::HashMap;

/// One resolved timing configuration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Config {
    pub data_queue_depth: u32,
    pub compute_queue_depth: u32,
    pub vdm_num_banks: u32,
    pub vls_pipeline_depth: u32,
    pub num_lanes: u32,
    pub pipeline_depth_add: u32,
    pub pipeline_depth_mul: u32,
    pub pipeline_depth_div: u32,
}

const KEYS: &[&str] = &[
    "dataQueueDepth",
    "computeQueueDepth",
    "vdmNumBanks",
    "vlsPipelineDepth",
    "numLanes",
    "pipelineDepthAdd",
    "pipelineDepthMul",
    "pipelineDepthDiv",
];

fn required(
    values: &HashMap<String, u32>,
    key: &'static str,
) -> Result<u32, ConfigError> {
    values
        .get(key)
        .copied()
        .ok_or(ConfigError::MissingKey { key })
}

/// Parses `source` (the contents of `Config.txt`): `key = value` lines, `#`
/// comments and blank lines ignored, a comment permitted after the value.
pub fn parse(source: &str) -> Result<Config, ConfigError> {
    let mut values = HashMap::new();

    for raw_line in source.lines() {
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::NotAnInteger {
            key: "<unparsable line>",
            value: raw_line.to_string(),
        })?;
        let key = key.trim().to_string();
        let value = value.trim();

        let known_name: &'static str = KEYS.iter().find(|&&k| k == key).copied().unwrap_or("<unknown key>");
        let parsed: u32 = value.parse().map_err(|_| ConfigError::NotAnInteger {
            key: known_name,
            value: value.to_string(),
        })?;
        values.insert(key, parsed);
    }

    Ok(Config {
        data_queue_depth: required(&values, "dataQueueDepth")?,
        compute_queue_depth: required(&values, "computeQueueDepth")?,
        vdm_num_banks: required(&values, "vdmNumBanks")?,
        vls_pipeline_depth: required(&values, "vlsPipelineDepth")?,
        num_lanes: required(&values, "numLanes")?,
        pipeline_depth_add: required(&values, "pipelineDepthAdd")?,
        pipeline_depth_mul: required(&values, "pipelineDepthMul")?,
        pipeline_depth_div: required(&values, "pipelineDepthDiv")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# a full config
dataQueueDepth = 4
computeQueueDepth = 4
vdmNumBanks = 8 # banks
vlsPipelineDepth = 2
numLanes = 1
pipelineDepthAdd = 2
pipelineDepthMul = 4
pipelineDepthDiv = 8
";

    #[test]
    fn parses_a_complete_config() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.vdm_num_banks, 8);
        assert_eq!(config.pipeline_depth_div, 8);
        assert_eq!(config.num_lanes, 1);
    }

    #[test]
    fn missing_key_is_an_error() {
        let missing = "dataQueueDepth = 4\n";
        assert!(matches!(
            parse(missing),
            Err(ConfigError::MissingKey { .. })
        ));
    }

    #[test]
    fn non_integer_value_is_an_error() {
        let bad = SAMPLE.replace("vdmNumBanks = 8 # banks", "vdmNumBanks = many");
        assert!(matches!(
            parse(&bad),
            Err(ConfigError::NotAnInteger { .. })
        ));
    }
}
