use crate::config::AppPaths;
use crate::error::AppResult;
use crate::output::Output;
use crate::profile::FileProfileRepository;
use crate::services::ProfileService;

#[derive(Debug)]
pub struct AppContext {
    pub paths: AppPaths,
    pub repository: FileProfileRepository,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(json: bool) -> AppResult<Self> {
        let paths = AppPaths::discover()?;
        tracing::debug!(root = %paths.root().display(), "using profile store");
        let repository = FileProfileRepository::new(paths.clone());
        let output = Output::new(json);

        Ok(Self {
            paths,
            repository,
            output,
        })
    }

    pub fn profiles(&self) -> ProfileService<'_, FileProfileRepository> {
        ProfileService::new(&self.repository)
    }
}
