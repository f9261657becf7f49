use std::path::Path;

use parley_core::{Actor, Condition, ResponseInfo, World};
use parley_script::{CompileScope, Diagnostic, render_diagnostics};

/// Actors that could speak `info`: those named by an actor condition, or
/// every actor when the info names none.
fn speakers<'w>(info: &ResponseInfo, world: &'w World) -> Vec<&'w Actor> {
    let named: Vec<&Actor> = info
        .conditions
        .iter()
        .filter_map(|c| match c {
            Condition::Actor { name } => world.find_actor(name),
            _ => None,
        })
        .collect();

    if named.is_empty() { world.actors() } else { named }
}

/// Compile `source` for each candidate speaker. Passes if any speaker's
/// namespace accepts it; otherwise returns the first speaker's diagnostics.
fn check_script(source: &str, speakers: &[&Actor], world: &World) -> Result<(), Vec<Diagnostic>> {
    let globals_only = CompileScope::new().with_globals(&world.game);
    if speakers.is_empty() {
        return parley_script::compile_source(source, &globals_only).map(|_| ());
    }

    let mut first_failure = None;
    for actor in speakers {
        let scope = match actor.locals.as_ref() {
            Some(locals) => globals_only.with_locals(locals),
            None => globals_only,
        };
        match parley_script::compile_source(source, &scope) {
            Ok(_) => return Ok(()),
            Err(diags) => {
                first_failure.get_or_insert(diags);
            }
        }
    }
    Err(first_failure.unwrap_or_default())
}

pub fn run(db: &Path) -> Result<(), String> {
    let database = super::load_database(db)?;
    let (store, world) = database.into_parts().map_err(|e| e.to_string())?;

    let mut scripts = 0;
    let mut failed = 0;
    let mut errors = 0;

    for group in store.iter() {
        for info in &group.infos {
            let Some(source) = info.effect_script() else {
                continue;
            };
            if source.trim().is_empty() {
                continue;
            }
            scripts += 1;

            if let Err(diags) = check_script(source, &speakers(info, &world), &world) {
                failed += 1;
                errors += diags.len();
                let label = format!("{} / {}", group.id, info.id);
                eprint!("{}", render_diagnostics(source, &label, &diags));
            }
        }
    }

    if failed > 0 {
        eprintln!("  {} error{}", errors, super::plural(errors));
        return Err(format!(
            "{failed} of {scripts} script{} failed to compile",
            super::plural(scripts)
        ));
    }

    println!("  All checks passed for '{}'.", db.display());
    println!(
        "  {} dialogue group{}, {} actor{}, {} script{}",
        store.len(),
        super::plural(store.len()),
        world.actor_count(),
        super::plural(world.actor_count()),
        scripts,
        super::plural(scripts),
    );

    Ok(())
}
