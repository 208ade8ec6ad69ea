use crate::error::InitProcessError;
use pnet::datalink::{self, NetworkInterface};
use std::io::{self, Write};

/// 設定で名前が指定されていればそれを使い、なければ標準入力で選ばせる
pub fn select_device(name: Option<&str>) -> Result<NetworkInterface, InitProcessError> {
    let interfaces = datalink::interfaces();

    if let Some(name) = name {
        return find_by_name(&interfaces, name).ok_or_else(|| {
            InitProcessError::DeviceSelectionError(format!("デバイスが見つかりません: {}", name))
        });
    }

    println!("利用可能なデバイス:");
    for (index, interface) in interfaces.iter().enumerate() {
        println!("{}. {}", index + 1, interface.name);
    }

    print!("キャプチャするデバイスの番号を入力してください: ");
    io::stdout()
        .flush()
        .map_err(|e| InitProcessError::DeviceSelectionError(e.to_string()))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| InitProcessError::DeviceSelectionError(e.to_string()))?;

    pick_by_number(&interfaces, &input)
}

fn find_by_name(interfaces: &[NetworkInterface], name: &str) -> Option<NetworkInterface> {
    interfaces.iter().find(|interface| interface.name == name).cloned()
}

fn pick_by_number(interfaces: &[NetworkInterface], input: &str) -> Result<NetworkInterface, InitProcessError> {
    let device_index: usize = input
        .trim()
        .parse()
        .map_err(|_| InitProcessError::DeviceSelectionError(format!("数値ではありません: {}", input.trim())))?;

    if device_index == 0 || device_index > interfaces.len() {
        return Err(InitProcessError::DeviceSelectionError(
            "無効なデバイス番号です".to_string(),
        ));
    }

    Ok(interfaces[device_index - 1].clone())
}
