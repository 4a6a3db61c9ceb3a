//! Remote shell fragments that locate diagnostic tools inside the container.
//!
//! Every fragment binds `<TOOL>_COMMAND` for the rest of the composed
//! command, or exits with `<tool> not found` when the tool is missing.

/// Prologue of every composed command: fail unless a JVM is running.
pub const JAVA_DETECTION: &str = "if ! pgrep -x \"java\" > /dev/null; then \
     echo \"No 'java' process found running. Are you sure this is a Java app?\" >&2; exit 1; fi";

/// Async-profiler binary; also a fallback provider of `jcmd`.
pub const ASPROF: &str = "asprof";

/// Shell variable a probe binds for `tool`, e.g. `JCMD_COMMAND`.
#[must_use]
pub fn command_var(tool: &str) -> String {
    format!("{}_COMMAND", shell_name(tool))
}

fn shell_name(tool: &str) -> String {
    tool.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn find_executable(tool: &str) -> String {
    format!("$(find -executable -name {tool} | head -1 | tr -d '[:space:]')")
}

/// Strict probe: bind `<TOOL>_COMMAND` to the absolute path or fail.
fn required_probe(tool: &str) -> String {
    let path_var = format!("{}_TOOL_PATH", shell_name(tool));
    format!(
        "{path_var}={find}; if [ -z \"${{{path_var}}}\" ]; then echo \"{tool} not found\" >&2; exit 1; fi; \
         {command}=$(realpath \"${{{path_var}}}\")",
        find = find_executable(tool),
        command = command_var(tool),
    )
}

/// Remote fragment resolving `tool`.
///
/// `jcmd` is special: when the async profiler is installed, `JCMD_COMMAND`
/// runs `asprof jcmd` instead of a standalone `jcmd`, which some runtimes do
/// not ship. The profiler-embedded command always wins when present.
#[must_use]
pub fn resolve_probe(tool: &str) -> String {
    if tool != "jcmd" {
        return required_probe(tool);
    }
    let asprof_path = format!("{}_TOOL_PATH", shell_name(ASPROF));
    format!(
        "{asprof_path}={find}; if [ -n \"${{{asprof_path}}}\" ]; then \
         JCMD_COMMAND=\"$(realpath \"${{{asprof_path}}}\") jcmd\"; else {jcmd}; fi",
        find = find_executable(ASPROF),
        jcmd = required_probe("jcmd"),
    )
}
