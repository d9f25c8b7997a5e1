//! Devices command: list what adb can see.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::DeviceBridge;
use crate::output::json;

/// Run the devices command.
///
/// # Errors
///
/// Returns an error if adb cannot be run.
pub async fn run(app: &AppContext) -> Result<()> {
    let devices = app.bridge.devices().await?;

    if app.json {
        println!("{}", json::format_devices(&devices)?);
        return Ok(());
    }
    if devices.is_empty() {
        app.output.info("no devices attached");
        return Ok(());
    }
    for device in &devices {
        println!("{}\t{}", device.serial, device.state.as_str());
    }
    Ok(())
}
