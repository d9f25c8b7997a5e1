//! Remote command and script catalog.
//!
//! Every entry is a static template with `{package}` standing in for the
//! package identifier. Resolution is a plain string substitution with no
//! caching. Braces never occur in a valid [`PackageName`], so a resolved
//! command cannot contain the placeholder again.

use crate::domain::package::PackageName;

/// Token replaced by the package identifier.
pub const PLACEHOLDER: &str = "{package}";

macro_rules! staging_path {
    () => {
        "/data/local/tmp/apkdeploy.delete"
    };
}

macro_rules! working_dir {
    () => {
        "/data/adb/apkdeploy/"
    };
}

macro_rules! mount_script_path {
    () => {
        "/data/adb/service.d/mount_apkdeploy_{package}.sh"
    };
}

macro_rules! unmount_script_path {
    () => {
        "/data/adb/post-fs-data.d/umount_apkdeploy_{package}.sh"
    };
}

/// Where files are pushed before being moved into place.
pub const STAGING_PATH: &str = staging_path!();

/// Directory holding the mounted APKs.
pub const WORKING_DIR: &str = working_dir!();

/// Privilege probe. Runs unwrapped; a zero exit means `su` is available.
pub const ROOT_PROBE: &str = "su -h";

/// A command or script body with a `{package}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate(&'static str);

impl CommandTemplate {
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// The unresolved template text.
    #[must_use]
    pub const fn raw(self) -> &'static str {
        self.0
    }

    /// Substitute `package` for every placeholder.
    #[must_use]
    pub fn resolve(self, package: &PackageName) -> String {
        self.0.replace(PLACEHOLDER, package.as_str())
    }
}

pub const CREATE_DIR: CommandTemplate = CommandTemplate::new(concat!("mkdir -p ", working_dir!()));

pub const PREPARE_MOUNT: CommandTemplate = CommandTemplate::new(concat!(
    "base_path=\"",
    working_dir!(),
    "{package}.apk\" && mv ",
    staging_path!(),
    " $base_path && chmod 644 $base_path && chown system:system $base_path",
    " && chcon u:object_r:apk_data_file:s0 $base_path"
));

pub const MOUNT_SCRIPT: CommandTemplate = CommandTemplate::new(concat!(
    "#!/system/bin/sh\n",
    "while [ \"$(getprop sys.boot_completed | tr -d '\\r')\" != \"1\" ]; do sleep 1; done\n",
    "\n",
    "base_path=\"",
    working_dir!(),
    "{package}.apk\"\n",
    "stock_path=$(pm path {package} | grep base | sed 's/package://g')\n",
    "\n",
    "[ -n \"$stock_path\" ] || exit 1\n",
    "chcon u:object_r:apk_data_file:s0 \"$base_path\"\n",
    "mount -o bind \"$base_path\" \"$stock_path\"\n"
));

pub const INSTALL_MOUNT: CommandTemplate = CommandTemplate::new(concat!(
    "mv ",
    staging_path!(),
    " ",
    mount_script_path!(),
    " && chmod +x ",
    mount_script_path!()
));

/// Lazily unmounts this package's own base APK mounts and prints each
/// target. Exits 0 when nothing is mounted, non-zero if an unmount fails.
pub const UNMOUNT_SCRIPT: CommandTemplate = CommandTemplate::new(concat!(
    "#!/system/bin/sh\n",
    "status=0\n",
    "while read -r _ target _; do\n",
    "  case \"$target\" in\n",
    "    */{package}-*/base.apk)\n",
    "      if umount -l \"$target\"; then echo \"$target\"; else status=1; fi\n",
    "      ;;\n",
    "  esac\n",
    "done < /proc/mounts\n",
    "exit $status\n"
));

pub const INSTALL_UNMOUNT: CommandTemplate = CommandTemplate::new(concat!(
    "mv ",
    staging_path!(),
    " ",
    unmount_script_path!(),
    " && chmod +x ",
    unmount_script_path!()
));

/// Runs the installed unmount script.
pub const UNMOUNT: CommandTemplate = CommandTemplate::new(unmount_script_path!());

/// Runs the installed mount script.
pub const MOUNT: CommandTemplate = CommandTemplate::new(mount_script_path!());

pub const RESTART: CommandTemplate = CommandTemplate::new(
    "am force-stop {package} && monkey -p {package} -c android.intent.category.LAUNCHER 1",
);

pub const LOGCAT: CommandTemplate =
    CommandTemplate::new("logcat -c && logcat | grep --line-buffered -e AndroidRuntime -e {package}");

pub const PID_OF: CommandTemplate = CommandTemplate::new("pidof -s {package}");

/// Every template in the catalog, for exhaustive checks.
pub const ALL: &[CommandTemplate] = &[
    CREATE_DIR,
    PREPARE_MOUNT,
    MOUNT_SCRIPT,
    INSTALL_MOUNT,
    UNMOUNT_SCRIPT,
    INSTALL_UNMOUNT,
    UNMOUNT,
    MOUNT,
    RESTART,
    LOGCAT,
    PID_OF,
];

/// Quote `arg` for a POSIX shell using single quotes.
#[must_use]
pub fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Wrap a resolved command so it runs as root via `su -c`.
#[must_use]
pub fn as_root(command: &str) -> String {
    format!("su -c {}", shell_quote(command))
}
