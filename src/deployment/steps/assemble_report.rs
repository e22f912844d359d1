use tracing::instrument;

use crate::deployment::DeploymentContext;
use crate::report::Report;
use crate::serde_utils;

pub const REPORT_PATH: &str = "report.yml";

#[instrument(skip_all)]
pub async fn assemble_report(
    context: &DeploymentContext,
    report: &Report,
) -> eyre::Result<()> {
    let path = context.deployment_dir.join(REPORT_PATH);
    serde_utils::write_serialize(path, report).await?;

    Ok(())
}
