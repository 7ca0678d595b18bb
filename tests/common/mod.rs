#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Writes an executable shell script standing in for an external converter.
#[cfg(unix)]
pub fn write_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, script).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("stat script").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    path
}

pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read_dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Mimics `pdftohtml -stdout -noframes`: a full page whose body holds the
/// input file, plus the arguments and working directory as comments.
pub const FAKE_PDFTOHTML: &str = r##"#!/bin/sh
for last; do :; done
printf '<!DOCTYPE html><html>\n<head>\n<title>%s</title>\n</head>\n' "$last"
printf '<body bgcolor="#A0A0A0" vlink="blue" link="blue">\n'
printf '<!-- args: %s -->\n' "$*"
printf '<!-- cwd: %s -->\n' "$(pwd -P)"
cat "$last"
printf '\n</body>\n</html>\n'
"##;

/// Mimics `unrtf --html`.
pub const FAKE_UNRTF: &str = r#"#!/bin/sh
for last; do :; done
printf '<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">\n<html>\n<head>\n'
printf '<meta http-equiv="content-type" content="text/html; charset=utf-8">\n'
printf '<!-- args: %s -->\n' "$*"
printf '<title>%s</title>\n</head>\n<body><font size="3">' "$last"
cat "$last"
printf '</font>\n<p>end</p></body>\n</html>\n'
"#;

pub const FAILING_TOOL: &str = "#!/bin/sh\necho 'boom: broken input' >&2\nexit 3\n";

pub const SLOW_TOOL: &str = "#!/bin/sh\nexec sleep 5\n";

/// A wrapper script whose real work happens in a child of the shell.
pub const SLOW_WRAPPER_TOOL: &str = "#!/bin/sh\nsleep 4\necho late\n";

/// Exits at once but leaves a background child holding stdout open.
pub const LINGERING_CHILD_TOOL: &str =
    "#!/bin/sh\n(sleep 4; echo late) &\nprintf '<html><body>early</body></html>'\n";
