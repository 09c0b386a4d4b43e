use std::env;
use std::path::Path;

use anyhow::{anyhow, Context};
use linux_embedded_hal::I2cdev;

use grideye::calculations::WIDTH;
use grideye::protocol::format_frame;
use grideye::{DeviceAddress, GridEye, ThermalFrame};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        return Err(anyhow!("Two arguments required: <I2C bus> <sensor address>"));
    }
    let address: u8 = if let Some(hex_digits) = args[2].strip_prefix("0x") {
        u8::from_str_radix(hex_digits, 16)?
    } else {
        args[2].parse()?
    };
    let address = match address {
        0x68 => DeviceAddress::Primary,
        0x69 => DeviceAddress::Alternate,
        _ => return Err(anyhow!("A Grid-EYE can only be at 0x68 or 0x69")),
    };
    let bus_path = Path::new(&args[1]);
    let bus = I2cdev::new(bus_path)
        .with_context(|| format!("{} should be an I2C device", bus_path.display()))?;
    let mut sensor = GridEye::new(bus, address);
    sensor.initialize()?;
    sensor.capture_frame()?;
    let thermistor = sensor.read_thermistor()?;

    print_temperatures(sensor.temperatures(), WIDTH);
    println!();
    let (cold_row, cold_column) = ThermalFrame::coordinates(sensor.cold_index())
        .context("The coldest pixel should be in the frame")?;
    let (hot_row, hot_column) = ThermalFrame::coordinates(sensor.hot_index())
        .context("The hottest pixel should be in the frame")?;
    println!(
        "Coldest: {:4.2}℃ at ({}, {})",
        sensor.min_temperature(),
        cold_row,
        cold_column
    );
    println!(
        "Hottest: {:4.2}℃ at ({}, {})",
        sensor.max_temperature(),
        hot_row,
        hot_column
    );
    println!("Thermistor: {:4.2}℃", thermistor);
    match format_frame(sensor.temperatures()) {
        Ok(line) => print!("{}", line),
        Err(err) => println!("Frame can't be sent over the text protocol: {}", err),
    }
    Ok(())
}

fn print_temperatures(temperatures: &[f32], width: usize) {
    for (count, temperature) in temperatures.iter().enumerate() {
        if count % width == 0 {
            println!();
        }
        print!("{:6.2}  ", temperature);
    }
}
