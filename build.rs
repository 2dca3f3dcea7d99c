fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=wifi.local.rs");
    println!("cargo:rerun-if-env-changed=PILLBOX_AP_SSID");
    println!("cargo:rerun-if-env-changed=PILLBOX_AP_PASSWORD");
    println!("cargo:rerun-if-env-changed=PILLBOX_CONFIG_JSON");

    // Access-point credentials may live in an untracked `wifi.local.rs`
    // instead of the environment.
    emit_local_ap_credentials();

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

fn emit_local_ap_credentials() {
    let Ok(src) = std::fs::read_to_string("wifi.local.rs") else {
        return;
    };

    if std::env::var_os("PILLBOX_AP_SSID").is_none() {
        if let Some(v) = extract_str_const(&src, "AP_SSID") {
            println!("cargo:rustc-env=PILLBOX_AP_SSID={v}");
        }
    }
    if std::env::var_os("PILLBOX_AP_PASSWORD").is_none() {
        if let Some(v) = extract_str_const(&src, "AP_PASSWORD") {
            println!("cargo:rustc-env=PILLBOX_AP_PASSWORD={v}");
        }
    }
}

fn extract_str_const(src: &str, name: &str) -> Option<String> {
    let needle = format!("pub const {name}");
    for line in src.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("//") || !trimmed.starts_with(&needle) {
            continue;
        }
        let start = trimmed.find('"')?;
        let end = trimmed[start + 1..].find('"')? + start + 1;
        return Some(trimmed[start + 1..end].to_string());
    }
    None
}
