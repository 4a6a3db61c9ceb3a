//! The operation catalog: every diagnostic the CLI can run, with its remote
//! command template and artifact handling.
//!
//! Built once per process and read-only afterwards.

use std::sync::LazyLock;

use crate::domain::template::{Placeholder, Template};

// ── Descriptor ───────────────────────────────────────────────────────────────

/// How an operation's remote output reaches the local machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactMode {
    /// Output is the command's stdout; nothing is downloaded.
    None,
    /// One well-known remote file, named through `@FILE_NAME`.
    SingleFile,
    /// Whatever lands in `<fspath>/<folder>`; downloaded entry by entry.
    ArbitraryFiles { folder: &'static str },
}

/// Static description of one operation.
#[derive(Debug, Clone)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub required_tools: &'static [&'static str],
    pub artifact: ArtifactMode,
    /// The template writes a named file that a later operation collects.
    pub needs_file_name: bool,
    pub file_extension: &'static str,
    pub file_label: &'static str,
    pub file_name_part: &'static str,
    /// Glob used when the runtime ignored the requested file name.
    pub search_pattern: &'static str,
    /// The artifact may still be growing after the command returns.
    pub async_write: bool,
    /// Needs a SapMachine-style runtime or the bundled async profiler.
    pub only_on_recent_runtime: bool,
    pub template: Template,
}

impl OperationDescriptor {
    #[must_use]
    pub fn produces_single_file(&self) -> bool {
        self.artifact == ArtifactMode::SingleFile
    }

    #[must_use]
    pub fn produces_arbitrary_files(&self) -> bool {
        matches!(self.artifact, ArtifactMode::ArbitraryFiles { .. })
    }

    #[must_use]
    pub fn produces_artifact(&self) -> bool {
        self.artifact != ArtifactMode::None
    }

    /// Whether free-form arguments are accepted.
    #[must_use]
    pub fn supports_args(&self) -> bool {
        self.template.references(Placeholder::Args)
    }

    /// Whether `@FILE_NAME` and `@STATIC_FILE_NAME` must be bound.
    #[must_use]
    pub fn uses_file_name(&self) -> bool {
        self.needs_file_name || self.produces_single_file()
    }

    /// Whether the operation writes into a remote working directory, which
    /// then has to be discovered (or validated, when given explicitly).
    #[must_use]
    pub fn uses_remote_dir(&self) -> bool {
        self.uses_file_name() || self.produces_arbitrary_files()
    }

    /// One-line description for listings, flagging runtime-gated operations.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.only_on_recent_runtime {
            format!("{} (recent runtime only)", self.description)
        } else {
            self.description.to_string()
        }
    }

    /// Label with the first letter upper-cased, for sentence-initial messages.
    #[must_use]
    pub fn file_label_sentence(&self) -> String {
        let mut chars = self.file_label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

// ── Templates ────────────────────────────────────────────────────────────────

const HEAP_DUMP: &str = "if [ -f @FILE_NAME ]; then echo >&2 'Heap dump @FILE_NAME already exists'; exit 1; fi; \
    JMAP_COMMAND=$(find -executable -name jmap | head -1 | tr -d '[:space:]'); \
    JVMMON_COMMAND=$(find -executable -name jvmmon | head -1 | tr -d '[:space:]'); \
    if [ -z \"${JMAP_COMMAND}\" ] && [ -z \"${JVMMON_COMMAND}\" ]; then \
    echo >&2 \"jvmmon or jmap are required for generating heap dump, you can modify your application manifest.yaml \
    on the 'JBP_CONFIG_OPEN_JDK_JRE' environment variable to use a JDK\"; exit 1; fi; \
    if [ -n \"${JMAP_COMMAND}\" ]; then \
    OUTPUT=$( ${JMAP_COMMAND} -dump:format=b,file=@FILE_NAME $(pidof java) ) || STATUS_CODE=$?; \
    if [ ! -s @FILE_NAME ]; then echo >&2 ${OUTPUT}; exit 1; fi; \
    if [ ${STATUS_CODE:-0} -gt 0 ]; then echo >&2 ${OUTPUT}; exit ${STATUS_CODE}; fi; \
    elif [ -n \"${JVMMON_COMMAND}\" ]; then \
    echo -e 'change command line flag flags=-XX:HeapDumpOnDemandPath=@FSPATH\\ndump heap' > @FSPATH/setHeapDumpOnDemandPath.sh; \
    OUTPUT=$( ${JVMMON_COMMAND} -pid $(pidof java) -cmd \"@FSPATH/setHeapDumpOnDemandPath.sh\" ) || STATUS_CODE=$?; \
    rm -f @FSPATH/setHeapDumpOnDemandPath.sh; \
    if [ ${STATUS_CODE:-0} -gt 0 ]; then echo >&2 ${OUTPUT}; exit ${STATUS_CODE}; fi; fi";

const THREAD_DUMP: &str = "JSTACK_COMMAND=$(find -executable -name jstack | head -1 | tr -d '[:space:]'); \
    JVMMON_COMMAND=$(find -executable -name jvmmon | head -1 | tr -d '[:space:]'); \
    if [ -z \"${JSTACK_COMMAND}\" ] && [ -z \"${JVMMON_COMMAND}\" ]; then \
    echo >&2 \"jvmmon or jstack are required for generating thread dump, you can modify your application manifest.yaml \
    on the 'JBP_CONFIG_OPEN_JDK_JRE' environment variable to use a JDK\"; exit 1; fi; \
    if [ -n \"${JSTACK_COMMAND}\" ]; then ${JSTACK_COMMAND} $(pidof java); \
    else ${JVMMON_COMMAND} -pid $(pidof java) -c \"print stacktrace\"; fi";

const JFR_RUNNING_GUARD: &str = "if $JCMD_COMMAND $(pidof java) JFR.check | grep -q 'name=JFR'; then \
    echo >&2 \"JFR recording already running. Stop it with 'cf-java jfr-stop @APP_NAME' first\"; exit 1; fi";

const JFR_STOP_HINT: &str =
    "| sed \"s/Use jcmd [0-9]* JFR.dump name=JFR to copy recording data to file./Use 'cf-java jfr-stop @APP_NAME' to copy the file to the local folder/\"";

fn jfr_start(settings: &str) -> String {
    format!(
        "{JFR_RUNNING_GUARD}; $JCMD_COMMAND $(pidof java) JFR.start settings={settings} \
         filename=@FILE_NAME name=JFR {JFR_STOP_HINT}"
    )
}

fn asprof_start(event: &str) -> String {
    format!(
        "$ASPROF_COMMAND start $(pidof java) -e {event} -f @FILE_NAME -o jfr && \
         echo \"Profiling started\" && \
         echo \"Use 'cf-java asprof-stop @APP_NAME' to copy the file to the local folder\""
    )
}

/// Templates borrow `'static` text; dynamically built ones are leaked once
/// when the catalog is created, which happens at most once per process.
fn leak(text: String) -> &'static str {
    Box::leak(text.into_boxed_str())
}

// ── Catalog ──────────────────────────────────────────────────────────────────

/// Ordered, read-only set of operations.
#[derive(Debug)]
pub struct Catalog {
    operations: Vec<OperationDescriptor>,
}

/// Process-wide catalog.
pub static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::builtin);

const JCMD: &[&str] = &["jcmd"];
const ASPROF: &[&str] = &["asprof"];

/// Shorthand for the common field layout; callers override what differs.
fn op(
    name: &'static str,
    description: &'static str,
    required_tools: &'static [&'static str],
    template: &'static str,
) -> OperationDescriptor {
    OperationDescriptor {
        name,
        description,
        required_tools,
        artifact: ArtifactMode::None,
        needs_file_name: false,
        file_extension: "",
        file_label: "",
        file_name_part: "",
        search_pattern: "",
        async_write: false,
        only_on_recent_runtime: false,
        template: Template::new(template),
    }
}

fn jfr_file(mut d: OperationDescriptor) -> OperationDescriptor {
    d.file_extension = ".jfr";
    d.file_label = "JFR recording";
    d.file_name_part = "jfr";
    d.search_pattern = "*.jfr";
    d
}

fn asprof_file(mut d: OperationDescriptor) -> OperationDescriptor {
    d = jfr_file(d);
    d.file_name_part = "asprof";
    d.only_on_recent_runtime = true;
    d
}

fn recent(mut d: OperationDescriptor) -> OperationDescriptor {
    d.only_on_recent_runtime = true;
    d
}

fn starts_recording(mut d: OperationDescriptor) -> OperationDescriptor {
    d.needs_file_name = true;
    d
}

fn single_file(mut d: OperationDescriptor) -> OperationDescriptor {
    d.artifact = ArtifactMode::SingleFile;
    d
}

impl Catalog {
    #[allow(clippy::too_many_lines)]
    fn builtin() -> Self {
        let mut heap_dump = single_file(op(
            "heap-dump",
            "Generate a heap dump from a running Java application",
            &[],
            HEAP_DUMP,
        ));
        heap_dump.file_extension = ".hprof";
        heap_dump.file_label = "heap dump";
        heap_dump.file_name_part = "heapdump";
        heap_dump.search_pattern = "java_pid*.hprof";
        heap_dump.async_write = true;

        let mut jcmd = op(
            "jcmd",
            "Run a JCMD command on a running Java application via --args, downloads and deletes all files that are created in the current folder, use '--no-download' to prevent this",
            JCMD,
            "$JCMD_COMMAND $(pidof java) @ARGS",
        );
        jcmd.artifact = ArtifactMode::ArbitraryFiles { folder: "jcmd" };

        let mut asprof = recent(op(
            "asprof",
            "Run async-profiler commands passed to asprof via --args, copies files in the current folder. Don't use in combination with asprof-* commands. Downloads and deletes all files that are created in the current folder, if not using 'start' asprof command, use '--no-download' to prevent this",
            ASPROF,
            "$ASPROF_COMMAND $(pidof java) @ARGS",
        ));
        asprof.artifact = ArtifactMode::ArbitraryFiles { folder: "asprof" };

        let operations = vec![
            heap_dump,
            op(
                "thread-dump",
                "Generate a thread dump from a running Java application",
                &[],
                THREAD_DUMP,
            ),
            op(
                "vm-info",
                "Print information about the Java Virtual Machine running a Java application",
                JCMD,
                "$JCMD_COMMAND $(pidof java) VM.info",
            ),
            op(
                "vm-version",
                "Print the version of the Java Virtual Machine running a Java application",
                JCMD,
                "$JCMD_COMMAND $(pidof java) VM.version",
            ),
            recent(op(
                "vm-vitals",
                "Print vital statistics about the Java Virtual Machine running a Java application",
                JCMD,
                "$JCMD_COMMAND $(pidof java) VM.vitals",
            )),
            jcmd,
            jfr_file(starts_recording(op(
                "jfr-start",
                "Start a Java Flight Recorder default recording on a running Java application (stores in the container-dir)",
                JCMD,
                leak(jfr_start("default.jfc")),
            ))),
            jfr_file(starts_recording(op(
                "jfr-start-profile",
                "Start a Java Flight Recorder profile recording on a running Java application (stores in the container-dir)",
                JCMD,
                leak(jfr_start("profile.jfc")),
            ))),
            recent(jfr_file(starts_recording(op(
                "jfr-start-gc",
                "Start a Java Flight Recorder GC recording on a running Java application (stores in the container-dir)",
                JCMD,
                leak(jfr_start("gc.jfc")),
            )))),
            recent(jfr_file(starts_recording(op(
                "jfr-start-gc-details",
                "Start a Java Flight Recorder detailed GC recording on a running Java application (stores in the container-dir)",
                JCMD,
                leak(jfr_start("gc_details.jfc")),
            )))),
            single_file(jfr_file(op(
                "jfr-stop",
                "Stop a Java Flight Recorder recording on a running Java application",
                JCMD,
                "$JCMD_COMMAND $(pidof java) JFR.stop name=JFR",
            ))),
            single_file(jfr_file(op(
                "jfr-dump",
                "Dump a Java Flight Recorder recording on a running Java application without stopping it",
                JCMD,
                "$JCMD_COMMAND $(pidof java) JFR.dump name=JFR filename=@FILE_NAME",
            ))),
            op(
                "jfr-status",
                "Check the running Java Flight Recorder recording on a running Java application",
                JCMD,
                "$JCMD_COMMAND $(pidof java) JFR.check",
            ),
            asprof,
            asprof_file(starts_recording(op(
                "asprof-start-cpu",
                "Start an async-profiler CPU-time profile recording on a running Java application",
                ASPROF,
                leak(asprof_start("cpu")),
            ))),
            asprof_file(starts_recording(op(
                "asprof-start-wall",
                "Start an async-profiler wall-clock profile recording on a running Java application",
                ASPROF,
                leak(asprof_start("wall")),
            ))),
            asprof_file(starts_recording(op(
                "asprof-start-alloc",
                "Start an async-profiler allocation profile recording on a running Java application",
                ASPROF,
                leak(asprof_start("alloc")),
            ))),
            asprof_file(starts_recording(op(
                "asprof-start-lock",
                "Start an async-profiler lock profile recording on a running Java application",
                ASPROF,
                leak(asprof_start("lock")),
            ))),
            single_file(asprof_file(op(
                "asprof-stop",
                "Stop an async-profiler profile recording on a running Java application",
                ASPROF,
                "$ASPROF_COMMAND stop $(pidof java)",
            ))),
            recent(op(
                "asprof-status",
                "Get the status of async-profiler on a running Java application",
                ASPROF,
                "$ASPROF_COMMAND status $(pidof java)",
            )),
        ];

        Self { operations }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.operations.iter()
    }

    /// Up to three operation names closest to `query` by edit distance.
    /// Ties keep catalog order; `query` itself is never suggested.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<&'static str> {
        let mut ranked: Vec<(usize, &'static str)> = self
            .operations
            .iter()
            .filter(|op| op.name != query)
            .map(|op| (levenshtein(query, op.name), op.name))
            .collect();
        ranked.sort_by_key(|(distance, _)| *distance);
        ranked.into_iter().take(3).map(|(_, name)| name).collect()
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Edit distance over Unicode scalar values.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// `["a", "b", "c"]` becomes `"a, b, or c"`; two items are joined with `" or "`.
#[must_use]
pub fn join_with_or(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => (*one).to_string(),
        [a, b] => format!("{a} or {b}"),
        [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
