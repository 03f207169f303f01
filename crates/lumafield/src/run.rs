use std::fs;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use presets::{Preset, PresetLibrary};
use renderer::{FrameOutcome, GlowContext, ShaderRuntime};
use tracing_subscriber::EnvFilter;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};

use crate::cli::Cli;
use crate::controls::Controls;
use crate::shadow;
use crate::surface;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let mut library = PresetLibrary::builtin();
    if let Some(path) = &cli.presets {
        let doc = fs::read_to_string(path)
            .with_context(|| format!("failed to read preset file {}", path.display()))?;
        library
            .merge_toml_str(&doc)
            .with_context(|| format!("invalid preset file {}", path.display()))?;
    }

    if cli.list_presets {
        for name in library.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let preset = library
        .get(&cli.preset)
        .ok_or_else(|| anyhow!("unknown preset '{}'; try --list-presets", cli.preset))?
        .clone();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (session, gl) = surface::create(
        &event_loop,
        cli.size.0,
        cli.size.1,
        &format!("lumafield ({})", preset.name),
    )?;

    let size = session.window.inner_size();
    let mut runtime = ShaderRuntime::new(GlowContext::new(gl), size.width, size.height)?;
    runtime.set_shader(preset.effect.fragment_source())?;
    for (name, value) in preset.uniform_values()? {
        runtime.set_uniform(name, value);
    }
    let mut controls = Controls::from_preset(&preset)?;

    if runtime.start() == FrameOutcome::Continue {
        session.window.request_redraw();
    }
    tracing::info!(preset = %preset.name, "rendering started");

    let preset_names: Vec<String> = library.names().map(str::to_owned).collect();
    let started = Instant::now();
    let mut last_frame = started;
    let mut current = preset;

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            match event {
                WindowEvent::CloseRequested => {
                    runtime.destroy();
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    session.resize(new_size);
                    runtime.resize(new_size.width, new_size.height);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let size = session.window.inner_size();
                    if size.width == 0 || size.height == 0 {
                        return;
                    }
                    // Normalise to [-1, 1] around the window centre, with
                    // +y pointing up to match clip space.
                    let x = (position.x as f32 / size.width as f32) * 2.0 - 1.0;
                    let y = -((position.y as f32 / size.height as f32) * 2.0 - 1.0);
                    controls.pointer_moved(x, y);
                    tracing::trace!(filter = %shadow::from_pointer(x, y), "drop shadow updated");
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => match logical_key {
                    Key::Named(NamedKey::Escape) => {
                        runtime.destroy();
                        elwt.exit();
                    }
                    Key::Named(NamedKey::Tab) => {
                        let next = library.next_after(&current.name).clone();
                        switch_preset(&mut runtime, &mut controls, &next);
                        current = next;
                    }
                    Key::Character(text) => {
                        let Ok(digit) = text.as_str().parse::<usize>() else {
                            return;
                        };
                        let Some(name) = digit.checked_sub(1).and_then(|i| preset_names.get(i))
                        else {
                            return;
                        };
                        if let Some(preset) = library.get(name) {
                            let preset = preset.clone();
                            switch_preset(&mut runtime, &mut controls, &preset);
                            current = preset;
                        }
                    }
                    _ => {}
                },
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_frame).as_secs_f32();
                    last_frame = now;

                    for (name, value) in controls.step(dt) {
                        runtime.set_uniform(name, value);
                    }
                    // Each completed frame schedules exactly one successor;
                    // a halted runtime lets the chain die out.
                    if runtime.frame(started.elapsed()) == FrameOutcome::Continue {
                        session.swap_buffers();
                        session.window.request_redraw();
                    }
                }
                _ => {}
            }
        })
        .context("event loop terminated abnormally")?;
    Ok(())
}

/// Swaps the fragment program and retargets the control springs. A rejected
/// shader keeps the previous program on screen, exactly as the runtime
/// guarantees.
fn switch_preset(
    runtime: &mut ShaderRuntime<GlowContext>,
    controls: &mut Controls,
    preset: &Preset,
) {
    match runtime.set_shader(preset.effect.fragment_source()) {
        Ok(()) => {
            if let Err(err) = controls.retarget(preset) {
                tracing::error!(%err, preset = %preset.name, "preset has an invalid colour");
                return;
            }
            tracing::info!(preset = %preset.name, blur = preset.blur, "preset selected");
        }
        Err(err) => {
            tracing::error!(%err, preset = %preset.name, "shader rejected, keeping current program");
        }
    }
}
