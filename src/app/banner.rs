use std::io::Write;

use crate::config::LoadPlan;
use crate::template::Template;

use super::SEPARATOR;

pub(crate) fn print_banner(plan: &LoadPlan) {
    let mut out = std::io::stdout().lock();
    if let Err(err) = write_banner(&mut out, plan) {
        tracing::debug!("Failed to print banner: {}", err);
    }
}

pub(crate) fn write_banner<W: Write>(out: &mut W, plan: &LoadPlan) -> std::io::Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, " Volley Load Tester")?;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Target:      {}", plan.url.as_str())?;
    writeln!(out, "Requests:    {}", plan.num_requests)?;
    writeln!(out, "Concurrency: {}", plan.concurrency)?;
    writeln!(out, "Method:      {}", plan.method)?;
    if let Some(names) = dynamic_names(&plan.url) {
        writeln!(out, "Dynamic URL: enabled ({})", names)?;
    }
    if let Some(names) = dynamic_names(&plan.body) {
        writeln!(out, "Dynamic Body: enabled ({})", names)?;
    }
    writeln!(out, "{}", SEPARATOR)?;
    out.flush()
}

fn dynamic_names(template: &Template) -> Option<String> {
    template
        .has_placeholders()
        .then(|| template.placeholders().join(", "))
}
