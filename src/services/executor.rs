use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use tracing::{debug, info};

use crate::binary::BinaryResolver;
use crate::error::{AppError, AppResult};
use crate::profile::ProfileRepository;

use super::profile::active_profile;

/// A resolved launch: the real binary, its arguments and the profile overlay.
#[derive(Debug, Clone)]
pub struct PreparedCommand {
    pub binary: String,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub profile: String,
    pub overlay: BTreeMap<String, String>,
}

impl PreparedCommand {
    /// Inherited environment with the profile overlay applied on top.
    pub fn environment(&self) -> BTreeMap<OsString, OsString> {
        merge_environment(env::vars_os(), &self.overlay)
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env_clear()
            .envs(self.environment());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;

            command.arg0(&self.binary);
        }

        command
    }
}

/// Runs wrapped binaries under their active profile.
#[derive(Debug)]
pub struct ExecutorService<'a, R, B> {
    repository: &'a R,
    resolver: &'a B,
}

impl<'a, R: ProfileRepository, B: BinaryResolver> ExecutorService<'a, R, B> {
    pub fn new(repository: &'a R, resolver: &'a B) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    pub fn prepare(&self, binary: &str, args: Vec<OsString>) -> AppResult<PreparedCommand> {
        let profile = active_profile(self.repository, binary)?;
        let program = self.resolver.resolve(binary)?;

        Ok(PreparedCommand {
            binary: binary.to_string(),
            program,
            args,
            profile: profile.name().to_string(),
            overlay: profile.into_environment(),
        })
    }

    /// Runs the binary with inherited stdio and returns its exit code.
    ///
    /// A nonzero child exit is a successful run from the wrapper's point of
    /// view; only a failure to start the process is an error.
    pub fn execute(&self, binary: &str, args: Vec<OsString>) -> AppResult<i32> {
        let prepared = self.prepare(binary, args)?;
        info!(
            binary,
            profile = %prepared.profile,
            program = %prepared.program.display(),
            variables = prepared.overlay.len(),
            "launching wrapped binary"
        );

        let status = prepared
            .command()
            .status()
            .map_err(|source| AppError::Launch {
                path: prepared.program.clone(),
                source,
            })?;

        let code = exit_code(status);
        debug!(binary, code, "wrapped binary exited");
        Ok(code)
    }
}

pub fn merge_environment<I>(
    inherited: I,
    overlay: &BTreeMap<String, String>,
) -> BTreeMap<OsString, OsString>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env: BTreeMap<OsString, OsString> = inherited.into_iter().collect();
    for (key, value) in overlay {
        env.insert(OsString::from(key), OsString::from(value));
    }
    env
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::profile::{MemoryProfileRepository, Profile};

    struct FixedResolver(Option<PathBuf>);

    impl BinaryResolver for FixedResolver {
        fn resolve(&self, binary: &str) -> AppResult<PathBuf> {
            self.0.clone().ok_or_else(|| AppError::BinaryNotFound {
                binary: binary.to_string(),
            })
        }
    }

    fn repo_with_current(vars: &[(&str, &str)]) -> MemoryProfileRepository {
        let repo = MemoryProfileRepository::new();
        let mut profile = Profile::empty("prod", "demo").expect("profile");
        for (key, value) in vars {
            profile.set_var(*key, *value).expect("var");
        }
        repo.save(&profile).expect("save");
        repo.set_current("prod", "demo").expect("current");
        repo
    }

    #[test]
    fn prepares_the_active_profile_and_real_binary() {
        let repo = repo_with_current(&[("FOO", "bar")]);
        let resolver = FixedResolver(Some(PathBuf::from("/usr/bin/demo")));
        let service = ExecutorService::new(&repo, &resolver);

        let prepared = service
            .prepare("demo", vec![OsString::from("echo"), OsString::from("$FOO")])
            .expect("prepare");

        assert_eq!(prepared.program, Path::new("/usr/bin/demo"));
        assert_eq!(prepared.profile, "prod");
        assert_eq!(prepared.args, ["echo", "$FOO"]);
        assert_eq!(prepared.overlay["FOO"], "bar");
    }

    #[test]
    fn profile_values_override_inherited_ones() {
        let overlay = BTreeMap::from([("FOO".to_string(), "bar".to_string())]);
        let inherited = vec![
            (OsString::from("FOO"), OsString::from("parent")),
            (OsString::from("HOME"), OsString::from("/home/dev")),
        ];

        let env = merge_environment(inherited, &overlay);

        assert_eq!(env[&OsString::from("FOO")], "bar");
        assert_eq!(env[&OsString::from("HOME")], "/home/dev");
    }

    #[test]
    fn missing_active_profile_is_reported_before_resolution() {
        let repo = MemoryProfileRepository::new();
        repo.save(&Profile::empty("prod", "demo").expect("profile"))
            .expect("save");
        let resolver = FixedResolver(None);
        let service = ExecutorService::new(&repo, &resolver);

        let err = service.prepare("demo", Vec::new()).expect_err("no profile");
        assert!(matches!(err, AppError::NoActiveProfile { .. }));
    }

    #[test]
    fn missing_binary_is_reported() {
        let repo = repo_with_current(&[]);
        let resolver = FixedResolver(None);
        let service = ExecutorService::new(&repo, &resolver);

        let err = service.prepare("demo", Vec::new()).expect_err("no binary");
        assert!(matches!(err, AppError::BinaryNotFound { .. }));
        assert_eq!(err.to_string(), "binary 'demo' not found in PATH");
    }

    #[test]
    fn launch_failure_is_distinct_from_exit_status() {
        let repo = repo_with_current(&[]);
        let resolver = FixedResolver(Some(PathBuf::from("/nonexistent/wrapper-test/demo")));
        let service = ExecutorService::new(&repo, &resolver);

        let err = service.execute("demo", Vec::new()).expect_err("cannot spawn");
        assert!(matches!(err, AppError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn propagates_child_exit_code() {
        let repo = repo_with_current(&[("EXIT_WITH", "3")]);
        let resolver = FixedResolver(Some(PathBuf::from("/bin/sh")));
        let service = ExecutorService::new(&repo, &resolver);

        let code = service
            .execute(
                "demo",
                vec![OsString::from("-c"), OsString::from("exit \"$EXIT_WITH\"")],
            )
            .expect("child runs");
        assert_eq!(code, 3);
    }
}
