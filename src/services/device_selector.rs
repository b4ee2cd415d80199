//! Attached device discovery and flashing through TyTools (`tyc`)

use crate::errors::{Result, TeensyBrewError};
use crate::models::{ArtifactReference, DeviceHandle, ExcludeSet};
use crate::utils::process::{ToolInvocation, ToolRunner};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Separates the serial number from the board model in the second field
const SERIAL_DELIMITER: char = '-';

/// Extract serial numbers from `tyc list` output.
///
/// Each line looks like `add 1743330-Teensy Teensy LC`: the serial is the
/// part of the second whitespace-separated field before the first `-`.
/// Duplicates collapse and the result is sorted.
pub fn parse_device_list(output: &str) -> Vec<String> {
    let mut serials = BTreeSet::new();
    for line in output.lines() {
        let Some(field) = line.split_whitespace().nth(1) else {
            if !line.trim().is_empty() {
                log::debug!("Ignoring device line without identifier: {:?}", line);
            }
            continue;
        };
        let serial = field.split(SERIAL_DELIMITER).next().unwrap_or(field);
        if !serial.is_empty() {
            serials.insert(serial.to_string());
        }
    }
    serials.into_iter().collect()
}

/// Exactly one device must remain once `exclude` is removed
pub fn choose_device(devices: &[String], exclude: &ExcludeSet) -> Result<DeviceHandle> {
    let remaining: Vec<&String> = devices.iter().filter(|d| !exclude.contains(d)).collect();
    match remaining.as_slice() {
        [] => Err(TeensyBrewError::NoDeviceFound),
        [only] => Ok(DeviceHandle::new(only.as_str())),
        many => Err(TeensyBrewError::AmbiguousDeviceSelection(
            many.iter().map(|d| d.to_string()).collect(),
        )),
    }
}

/// Lists, selects and flashes devices through the device tool
pub struct DeviceSelector {
    runner: Arc<dyn ToolRunner>,
    program: PathBuf,
}

impl DeviceSelector {
    pub fn new(runner: Arc<dyn ToolRunner>, program: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// Serial numbers of every attached device, queried fresh each call
    pub async fn list_devices(&self) -> Result<Vec<String>> {
        let invocation = ToolInvocation::new(&self.program).arg("list");
        let output = self.runner.run(&invocation).await.map_err(|e| {
            TeensyBrewError::DeviceListFailed(format!("could not run {}: {}", invocation, e))
        })?;
        if !output.is_success() {
            return Err(TeensyBrewError::DeviceListFailed(format!(
                "{} reported {}",
                invocation,
                output.failure_reason()
            )));
        }

        let devices = parse_device_list(&output.stdout);
        log::debug!("Attached devices: {:?}", devices);
        Ok(devices)
    }

    pub async fn select_target(&self, exclude: &ExcludeSet) -> Result<DeviceHandle> {
        let devices = self.list_devices().await?;
        for serial in &devices {
            if exclude.contains(serial) {
                log::info!("🚫 Excluding device {}", serial);
            }
        }
        let device = choose_device(&devices, exclude)?;
        log::info!("🎯 Target device: {}", device);
        Ok(device)
    }

    /// `tyc upload --board <serial> <image>`
    pub fn upload_invocation(&self, device: &DeviceHandle, artifact: &ArtifactReference) -> ToolInvocation {
        ToolInvocation::new(&self.program)
            .args(["upload", "--board"])
            .arg(&device.serial)
            .arg(&artifact.path)
    }

    pub async fn flash(&self, device: &DeviceHandle, artifact: &ArtifactReference) -> Result<()> {
        let invocation = self.upload_invocation(device, artifact);
        log::info!("🔥 Executing: {}", invocation);

        let output = self.runner.run(&invocation).await.map_err(|e| {
            TeensyBrewError::FlashFailed(format!("could not run {}: {}", invocation.tool_name(), e))
        })?;
        if !output.is_success() {
            return Err(TeensyBrewError::FlashFailed(output.failure_reason()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serials(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_tyc_list() {
        let output = "add 1743330-Teensy Teensy LC\r\nadd 2097150-Teensy Teensy 3.1\r\n\r\n";
        assert_eq!(parse_device_list(output), serials(&["1743330", "2097150"]));
    }

    #[test]
    fn test_parse_skips_short_lines_and_duplicates() {
        let output = "garbage\nadd 42-Teensy Teensy LC\nadd 42-Teensy Teensy LC\n";
        assert_eq!(parse_device_list(output), serials(&["42"]));
    }

    #[test]
    fn test_parse_field_without_delimiter() {
        assert_eq!(parse_device_list("add 77 Teensy"), serials(&["77"]));
    }

    #[test]
    fn test_choose_excluding_all_but_one() {
        let devices = serials(&["1", "2", "3"]);
        let exclude = ExcludeSet::parse("1,3");
        assert_eq!(choose_device(&devices, &exclude).unwrap(), DeviceHandle::new("2"));
    }

    #[test]
    fn test_choose_excluding_everything() {
        let devices = serials(&["1", "2"]);
        let exclude = ExcludeSet::parse("1,2");
        assert!(matches!(
            choose_device(&devices, &exclude),
            Err(TeensyBrewError::NoDeviceFound)
        ));
    }

    #[test]
    fn test_choose_with_nothing_attached() {
        assert!(matches!(
            choose_device(&[], &ExcludeSet::new()),
            Err(TeensyBrewError::NoDeviceFound)
        ));
    }

    #[test]
    fn test_choose_refuses_to_guess() {
        let devices = serials(&["1", "2"]);
        match choose_device(&devices, &ExcludeSet::new()) {
            Err(TeensyBrewError::AmbiguousDeviceSelection(left)) => {
                assert_eq!(left, serials(&["1", "2"]))
            }
            other => panic!("Expected AmbiguousDeviceSelection, got: {:?}", other),
        }
    }
}
