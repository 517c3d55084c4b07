//! Small harness demonstrating the Context-level wiring surface of
//! spec.md §6: construct N contexts, spawn one actor per context, install a
//! reactor via `reset`, seed an initial event via `send`, `exec` every
//! context, then `wait` for all of them to finish.

mod cli;
mod event;
mod reactor;

use std::sync::Arc;

use structopt::StructOpt;

use actor_rt::config::RuntimeConfig;
use actor_rt::Context;

use crate::event::DemoEvent;
use crate::reactor::EchoReactor;

fn main() -> anyhow::Result<()> {
    let opts = cli::Cli::from_args();

    let mut config = RuntimeConfig::default();
    if let Some(contexts) = opts.contexts {
        config.contexts = contexts;
    }
    config.validate()?;

    if config.install_tracing {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let mut contexts = Vec::with_capacity(config.contexts);
    for i in 0..config.contexts {
        let ctx = Context::with_thread_name(config.thread_name(i))?;
        let actor = ctx.spawn::<DemoEvent>();
        actor.reset(Some(Box::new(EchoReactor {
            label: config.thread_name(i),
            total: opts.pings,
        })));
        actor.send(Arc::new(DemoEvent::Ping(0)), 0);
        contexts.push(ctx);
    }

    for ctx in &contexts {
        ctx.exec()?;
    }
    for ctx in &contexts {
        ctx.wait();
    }

    Ok(())
}
