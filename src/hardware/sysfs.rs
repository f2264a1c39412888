// src/hardware/sysfs.rs - Linux sysfs GPIO output
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{LineError, OutputLine};

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/gpio";

const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// GPIO line driven through `/sys/class/gpio`.
///
/// The kernel creates `gpioN/` asynchronously after a write to `export`, and
/// udev may still be fixing permissions for a moment after that, so
/// `initialize` polls for the `direction` attribute before configuring it.
#[derive(Debug)]
pub struct SysfsLine {
    pin: u8,
    root: PathBuf,
    active_low: bool,
    export_timeout: Duration,
    exported_by_us: bool,
    initialized: bool,
}

impl SysfsLine {
    pub fn new(pin: u8, root: impl AsRef<Path>) -> Self {
        Self {
            pin,
            root: root.as_ref().to_path_buf(),
            active_low: false,
            export_timeout: Duration::from_secs(1),
            exported_by_us: false,
            initialized: false,
        }
    }

    pub fn with_active_low(mut self, active_low: bool) -> Self {
        self.active_low = active_low;
        self
    }

    pub fn with_export_timeout(mut self, timeout: Duration) -> Self {
        self.export_timeout = timeout;
        self
    }

    fn pin_dir(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.pin))
    }

    fn write_attr(&self, path: &Path, value: &str, action: &'static str) -> Result<(), LineError> {
        tracing::trace!("sysfs {} <- {}", path.display(), value);
        std::fs::write(path, value).map_err(|source| LineError::Io {
            pin: self.pin,
            action,
            source,
        })
    }

    fn write_level(&self, on: bool) -> Result<(), LineError> {
        if !self.initialized {
            return Err(LineError::NotInitialized(self.pin));
        }
        let high = on != self.active_low;
        self.write_attr(&self.pin_dir().join("value"), if high { "1" } else { "0" }, "write value")
    }

    fn wait_for_export(&self) -> Result<(), LineError> {
        let direction = self.pin_dir().join("direction");
        let started = Instant::now();
        while !direction.exists() {
            if started.elapsed() >= self.export_timeout {
                return Err(LineError::ExportTimeout {
                    pin: self.pin,
                    path: self.pin_dir(),
                });
            }
            std::thread::sleep(EXPORT_POLL_INTERVAL);
        }
        Ok(())
    }
}

impl OutputLine for SysfsLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn initialize(&mut self) -> Result<(), LineError> {
        if !self.pin_dir().exists() {
            tracing::debug!("Exporting GPIO {} via {}", self.pin, self.root.display());
            self.write_attr(&self.root.join("export"), &self.pin.to_string(), "export")?;
            self.exported_by_us = true;
            self.wait_for_export()?;
        } else {
            tracing::debug!("GPIO {} already exported", self.pin);
        }

        self.write_attr(&self.pin_dir().join("direction"), "out", "set direction")?;
        self.initialized = true;
        self.write_level(false)?;
        tracing::info!("GPIO {} configured as output", self.pin);
        Ok(())
    }

    fn assert(&mut self) -> Result<(), LineError> {
        self.write_level(true)
    }

    fn deassert(&mut self) -> Result<(), LineError> {
        self.write_level(false)
    }

    fn release(&mut self) -> Result<(), LineError> {
        self.initialized = false;
        if self.exported_by_us {
            self.exported_by_us = false;
            self.write_attr(&self.root.join("unexport"), &self.pin.to_string(), "unexport")?;
            tracing::debug!("Unexported GPIO {}", self.pin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_sysfs(pin: u8) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let gpio = dir.path().join(format!("gpio{pin}"));
        std::fs::create_dir(&gpio).unwrap();
        std::fs::write(gpio.join("direction"), "in").unwrap();
        std::fs::write(gpio.join("value"), "0").unwrap();
        dir
    }

    fn read(path: PathBuf) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_drive_pre_exported_pin() {
        let root = fake_sysfs(17);
        let mut line = SysfsLine::new(17, root.path());
        line.initialize().unwrap();
        assert_eq!(read(root.path().join("gpio17/direction")), "out");
        assert_eq!(read(root.path().join("gpio17/value")), "0");

        line.assert().unwrap();
        assert_eq!(read(root.path().join("gpio17/value")), "1");
        line.deassert().unwrap();
        assert_eq!(read(root.path().join("gpio17/value")), "0");

        line.release().unwrap();
        // Not exported by us, so left in place
        assert!(!root.path().join("unexport").exists());
    }

    #[test]
    fn test_active_low_inverts_levels() {
        let root = fake_sysfs(5);
        let mut line = SysfsLine::new(5, root.path()).with_active_low(true);
        line.initialize().unwrap();
        assert_eq!(read(root.path().join("gpio5/value")), "1");
        line.assert().unwrap();
        assert_eq!(read(root.path().join("gpio5/value")), "0");
    }

    #[test]
    fn test_write_before_initialize_fails() {
        let root = fake_sysfs(17);
        let mut line = SysfsLine::new(17, root.path());
        assert!(matches!(line.assert(), Err(LineError::NotInitialized(17))));
    }

    #[test]
    fn test_export_timeout() {
        let root = tempfile::tempdir().unwrap();
        let mut line = SysfsLine::new(22, root.path())
            .with_export_timeout(Duration::from_millis(30));
        let err = line.initialize().unwrap_err();
        assert!(matches!(err, LineError::ExportTimeout { pin: 22, .. }));
        assert_eq!(read(root.path().join("export")), "22");
    }

    #[test]
    fn test_missing_root_reports_io_error() {
        let mut line = SysfsLine::new(17, "/nonexistent/gpio/root");
        let err = line.initialize().unwrap_err();
        assert!(matches!(err, LineError::Io { action: "export", .. }));
    }
}
