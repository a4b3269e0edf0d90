use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages;
use crate::utils::date::parse_range;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        user,
        start,
        end,
        force,
    } = cmd
    {
        let range = parse_range(start.as_deref(), end.as_deref())?;
        let store = crate::open_store(cfg)?;
        let rows = store.read(|s| {
            ExportLogic::export(s, user.as_deref(), &range, *format, Path::new(file), *force)
        })?;
        messages::done(format!(
            "Exported {} session(s) as {} to {}",
            rows,
            format.as_str(),
            file
        ));
    }

    Ok(())
}
