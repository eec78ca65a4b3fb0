use anyhow::Result;

use super::HandlerContext;
use crate::presentation::console::write_insights;

pub fn handle(ctx: &HandlerContext) -> Result<()> {
    let client = ctx.client()?;
    let runtime = ctx.runtime()?;

    let insights = runtime.block_on(client.fetch_insights())?;

    let mut out = std::io::stdout().lock();
    write_insights(&mut out, &insights, ctx.format, ctx.color())
}
