use anyhow::{bail, Result};
use geo::Point;
use geodrill::{
    AttributeStyler, BoundaryLevel, Config, DirGeometrySource, GeometrySource, HttpGeometrySource, MapSession,
    SvgRenderer, UserAction,
};
use tracing::info;

use crate::cli::{ClickArgs, Cli, DrillArgs, LegendArgs, SelectionArgs, SourceArgs};

/// Open the boundary source: a local directory, or the boundary service
/// (`--url` over `service.base_url`).
fn open_source(config: &Config, args: &SourceArgs) -> Result<Box<dyn GeometrySource>> {
    if let Some(dir) = &args.source {
        info!(dir = %dir.display(), "reading boundaries from directory");
        return Ok(Box::new(DirGeometrySource::new(dir)?));
    }
    let service = service_config(config, args);
    info!(url = %service.base_url, "fetching boundaries from service");
    Ok(Box::new(HttpGeometrySource::from_config(&service)?))
}

fn service_config(config: &Config, args: &SourceArgs) -> geodrill::ServiceConfig {
    let mut service = config.service.clone();
    if let Some(url) = &args.url {
        service.base_url = url.clone();
    }
    service
}

/// Start a session against `source` and apply `selection` top-down,
/// completing each fetch before the next step.
fn drill_session(config: &Config, source: &dyn GeometrySource, selection: &SelectionArgs) -> Result<MapSession<SvgRenderer>> {
    let mut session = MapSession::with_config(SvgRenderer::new(), config);
    session.start();
    session.pump(source);

    let steps = [
        selection.state.clone().map(UserAction::SelectState),
        selection.district.clone().map(UserAction::SelectDistrict),
        selection.subdistrict.clone().map(UserAction::SelectSubdistrict),
    ];
    for action in steps.into_iter().flatten() {
        info!(?action, "applying");
        session.apply(action)?;
        session.pump(source);
    }
    Ok(session)
}

fn load_config(cli: &Cli) -> Result<Config> {
    Config::load(cli.config.as_deref())
}

fn print_summary(session: &MapSession<SvgRenderer>) {
    let path = session.path();
    println!("view:        {}", session.view());
    println!("state:       {}", path.state().unwrap_or("-"));
    println!("district:    {}", path.district().unwrap_or("-"));
    println!("subdistrict: {}", path.subdistrict().unwrap_or("-"));

    for level in BoundaryLevel::ALL {
        let options = session.options().get(level);
        if !options.is_empty() {
            println!("{level} options ({}): {}", options.len(), options.join(", "));
        }
    }

    let rendered = session.rendered();
    let level = session.controller().rendered_level().unwrap_or(BoundaryLevel::State);
    let names = session.controller().names().distinct_names(level, &rendered);
    println!("rendered {level} features ({}): {}", rendered.len(), names.join(", "));

    for notice in session.notices() {
        println!("notice: {notice}");
    }
}

pub fn drill(cli: &Cli, args: &DrillArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    if args.attribute.is_some() {
        config.attribute = args.attribute.clone();
    }
    let source = open_source(&config, &args.source)?;
    let session = drill_session(&config, source.as_ref(), &args.selection)?;

    if args.geojson {
        println!("{}", serde_json::to_string_pretty(&session.rendered().to_geojson())?);
    } else {
        print_summary(&session);
        for entry in session.legend() {
            println!("legend: {} {}", entry.color, entry.label);
        }
    }

    if let Some(svg) = &args.svg {
        info!(path = %svg.display(), "writing svg");
        session.renderer().to_svg(svg)?;
    }
    Ok(())
}

pub fn legend(_cli: &Cli, args: &LegendArgs) -> Result<()> {
    let styler = AttributeStyler::new();
    let specs = match &args.attribute {
        Some(key) => match styler.spec(key) {
            Some(spec) => vec![spec],
            None => bail!("[legend] Unknown attribute: {key}"),
        },
        None => styler.attributes().iter().collect(),
    };

    for spec in specs {
        println!("{} [{}]", spec.label, spec.code);
        for entry in styler.legend_for(spec.key) {
            println!("  {}  {}", entry.color, entry.label);
        }
    }
    Ok(())
}

pub fn click(cli: &Cli, args: &ClickArgs) -> Result<()> {
    let config = load_config(cli)?;
    let source = open_source(&config, &args.source)?;
    let mut session = drill_session(&config, source.as_ref(), &args.selection)?;

    match session.click_at(Point::new(args.lon, args.lat)) {
        Some(change) => {
            if let Some(region) = change.region() {
                let mut names: Vec<&str> = region.parent_path.iter().map(|p| &**p).collect();
                names.push(&region.name);
                println!("clicked {}: {}", region.level, names.join(" / "));
            }
            info!(level = %change.level, "click selected a region");
            session.pump(source.as_ref());
        }
        None => println!("click ignored"),
    }
    print_summary(&session);
    Ok(())
}
