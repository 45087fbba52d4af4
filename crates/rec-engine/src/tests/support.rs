use crate::StartOpts;

use std::path::Path;

/// Start options with defaults, no crop and a fixed display.
pub fn start_opts(output_dir: &Path) -> StartOpts {
    StartOpts {
        output_dir: Some(output_dir.to_path_buf()),
        x: None,
        y: None,
        width: None,
        height: None,
        device: Some(":0".to_string()),
        framerate: 30,
        preset: "ultrafast".to_string(),
        crf: 23,
    }
}

/// Pid above any kernel's pid_max, so never alive.
pub const DEAD_PID: i32 = 0x3FFF_FFFF;

/// Executable shell script at `path`.
#[cfg(unix)]
#[allow(clippy::unwrap_used)]
pub fn write_script(path: &Path, body: &str) {
    use std::{
        fs::{self, File},
        io::Write,
        os::unix::fs::PermissionsExt,
    };

    {
        let mut file = File::create(path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.sync_all().unwrap();
    }
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
