//! Bank UI Demo - Main Entry Point
//!
//! Builds the login, account and loan pages in memory and drives them with
//! scripted key presses, logging every focus move and announcement.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use bankui_a11y::registry;
use bankui_a11y::{
    A11yConfig, CountdownEvent, DomFocusAdapter, FieldError, Orientation, Politeness,
    SessionTimeoutCountdown, StepOutcome, StepWizard, SwitchControl, WizardStep,
};
use bankui_dom::{Document, Key, KeyboardEvent, NodeId};

struct Page {
    doc: Rc<RefCell<Document>>,
    login: NodeId,
    bankid: NodeId,
    tabs: Vec<NodeId>,
    switches: Vec<NodeId>,
    steps: Vec<WizardStep>,
    terms: NodeId,
    timeout: NodeId,
    extend: NodeId,
}

fn button(doc: &mut Document, parent: NodeId, label: &str) -> Result<NodeId> {
    let id = doc.append_element(parent, "button", &[("type", "button")])?;
    doc.append_text(id, label)?;
    Ok(id)
}

fn build_page() -> Result<Page> {
    let mut doc = Document::new();
    let body = doc.body();

    let login = button(&mut doc, body, "Logga in med BankID")?;
    let bankid = doc.append_element(
        body,
        "div",
        &[("role", "dialog"), ("aria-modal", "true"), ("hidden", "")],
    )?;
    button(&mut doc, bankid, "Öppna BankID-appen")?;
    button(&mut doc, bankid, "Avbryt")?;

    let tablist = doc.append_element(body, "div", &[("role", "tablist")])?;
    let tabs = ["Översikt", "Transaktioner", "Dokument"]
        .iter()
        .map(|label| button(&mut doc, tablist, label))
        .collect::<Result<Vec<_>>>()?;

    let switches = ["E-postnotiser", "SMS-notiser", "Push-notiser"]
        .iter()
        .map(|label| button(&mut doc, body, label))
        .collect::<Result<Vec<_>>>()?;

    let form = doc.append_element(body, "form", &[("novalidate", "")])?;
    let mut steps = Vec::new();
    let mut terms = NodeId::NONE;
    for name in ["Lånebelopp", "Personuppgifter", "Bekräfta"] {
        let container = doc.append_element(form, "div", &[])?;
        let heading = doc.append_element(container, "h2", &[])?;
        doc.append_text(heading, name)?;
        if name == "Bekräfta" {
            terms = doc.append_element(container, "input", &[("type", "checkbox"), ("id", "terms")])?;
        } else {
            doc.append_element(container, "input", &[("type", "text")])?;
        }
        steps.push(WizardStep::new(name, container));
    }

    let timeout = doc.append_element(body, "div", &[("role", "alertdialog"), ("hidden", "")])?;
    button(&mut doc, timeout, "Logga ut nu")?;
    let extend = button(&mut doc, timeout, "Förläng session")?;

    Ok(Page {
        doc: Rc::new(RefCell::new(doc)),
        login,
        bankid,
        tabs,
        switches,
        steps,
        terms,
        timeout,
        extend,
    })
}

fn press(key: Key, target: NodeId) {
    let mut event = KeyboardEvent::new(key, target);
    let dispatch = registry::dispatch_key(&mut event);
    tracing::debug!("{} on {} -> {:?}", event.key.as_str(), target, dispatch);
}

/// Tab key, with the platform's sequential navigation when not prevented
fn tab(page: &Page, shift: bool) -> Result<()> {
    let current = page.doc.borrow().active_element();
    let mut event = KeyboardEvent::tab(current, shift);
    let _ = registry::dispatch_key(&mut event);
    if event.is_default_prevented() {
        return Ok(());
    }

    let body = page.doc.borrow().body();
    let order: Vec<NodeId> = registry::with_router(|router| {
        router
            .resolver()
            .resolve(router.adapter(), body)
            .into_iter()
            .map(|e| e.id)
            .collect()
    })?;
    let next = match order.iter().position(|&id| id == current) {
        Some(i) if shift => order.get(i.wrapping_sub(1)).or(order.last()),
        Some(i) => order.get(i + 1).or(order.first()),
        None => order.first(),
    };
    if let Some(&next) = next {
        page.doc.borrow_mut().focus(next);
    }
    Ok(())
}

fn flush_announcements() {
    registry::with_announcer(|announcer| {
        while let Some(message) = announcer.next_announcement() {
            tracing::info!("[{}] {}", message.politeness.as_str(), message.text);
        }
    });
}

fn focused(page: &Page) -> String {
    let doc = page.doc.borrow();
    let id = doc.active_element();
    format!("{} \"{}\"", id, doc.tree().text_content(id))
}

fn bankid_modal(page: &Page) -> Result<()> {
    tracing::info!("--- BankID dialog ---");
    page.doc.borrow_mut().focus(page.login);
    page.doc.borrow_mut().remove_attr(page.bankid, "hidden")?;

    let guard = Rc::new(RefCell::new(Some(registry::activate_focus_scope(page.bankid)?)));
    registry::run_animation_frame();
    tracing::info!("initial focus: {}", focused(page));

    let close = {
        let guard = Rc::clone(&guard);
        let doc = Rc::clone(&page.doc);
        let dialog = page.bankid;
        registry::on_escape(move || {
            guard.borrow_mut().take();
            if let Err(e) = doc.borrow_mut().set_attr(dialog, "hidden", "") {
                tracing::warn!("could not hide dialog: {}", e);
            }
        })?
    };

    for _ in 0..3 {
        tab(page, false)?;
        tracing::info!("Tab -> {}", focused(page));
    }
    tab(page, true)?;
    tracing::info!("Shift+Tab -> {}", focused(page));

    let current = page.doc.borrow().active_element();
    press(Key::Escape, current);
    tracing::info!("after Escape: {}", focused(page));
    close.unsubscribe();
    Ok(())
}

fn account_tabs(page: &Page) -> Result<()> {
    tracing::info!("--- Account tabs ---");
    let group = registry::create_roving_group(Orientation::Horizontal, true)?;
    for &tab in &page.tabs {
        registry::register_roving_item(group, tab)?;
    }
    page.doc.borrow_mut().focus(page.tabs[0]);

    for key in [Key::ArrowRight, Key::End, Key::ArrowRight, Key::Home, Key::ArrowLeft] {
        let current = page.doc.borrow().active_element();
        let label = key.as_str().to_string();
        press(key, current);
        tracing::info!("{} -> {}", label, focused(page));
    }
    Ok(())
}

fn notification_switches(page: &Page) -> Result<()> {
    tracing::info!("--- Notification settings ---");
    let mut adapter = DomFocusAdapter::new(Rc::clone(&page.doc));
    let mut switches: Vec<SwitchControl> = page
        .switches
        .iter()
        .zip([true, false, true])
        .map(|(&node, checked)| SwitchControl::new(checked).bind(node, &mut adapter))
        .collect();

    for (switch, &node) in switches.iter_mut().zip(&page.switches) {
        let name = page.doc.borrow().tree().text_content(node);
        switch.subscribe(move |checked| {
            registry::announce(
                &format!("{} {}", name, if checked { "på" } else { "av" }),
                Politeness::Polite,
            );
        });
    }

    let mut space = KeyboardEvent::new(Key::Space, page.switches[1]);
    switches[1].handle_key(&mut space, &mut adapter);
    switches[0].click(&mut adapter);

    for (switch, &node) in switches.iter().zip(&page.switches) {
        tracing::info!(
            "{} aria-checked={} ({})",
            node,
            page.doc.borrow().get_attr(node, "aria-checked").unwrap_or("-"),
            switch.state_label()
        );
    }
    flush_announcements();
    Ok(())
}

fn advance(wizard: &mut StepWizard, errors: &[FieldError], submit: bool) -> Result<StepOutcome> {
    let outcome = registry::with_router(|router| {
        registry::with_announcer(|announcer| {
            if submit {
                wizard.submit(errors, router, announcer)
            } else {
                wizard.next(errors, router, announcer)
            }
        })
    })?;
    Ok(outcome)
}

fn loan_wizard(page: &Page) -> Result<()> {
    tracing::info!("--- Loan application ---");
    let mut wizard = registry::with_router(|router| StepWizard::new(page.steps.clone(), router))?;

    for _ in 0..2 {
        let outcome = advance(&mut wizard, &[], false)?;
        registry::run_animation_frame();
        tracing::info!("{:?}, focus on {}", outcome, focused(page));
    }

    let errors = [FieldError::new(page.terms, "Du måste godkänna villkoren för att fortsätta")];
    let outcome = advance(&mut wizard, &errors, true)?;
    registry::run_animation_frame();
    tracing::info!("{:?}, focus on {}", outcome, focused(page));

    page.doc.borrow_mut().set_attr(page.terms, "checked", "")?;
    let outcome = advance(&mut wizard, &[], true)?;
    tracing::info!("{:?}", outcome);
    flush_announcements();
    Ok(())
}

fn session_timeout(page: &Page, config: &A11yConfig) -> Result<()> {
    tracing::info!("--- Session timeout ---");
    page.doc.borrow_mut().remove_attr(page.timeout, "hidden")?;
    let guard = registry::activate_focus_scope(page.timeout)?;
    registry::run_animation_frame();

    let mut countdown = SessionTimeoutCountdown::new(&config.session);
    registry::with_announcer(|a| countdown.open(a));

    for _ in 0..12 {
        if registry::with_announcer(|a| countdown.tick(a)) == CountdownEvent::Expired {
            tracing::warn!("session expired");
            break;
        }
    }
    tracing::info!("{}", countdown.display_text());

    page.doc.borrow_mut().focus(page.extend);
    registry::with_announcer(|a| countdown.extend(a));
    tracing::info!("{}", countdown.display_text());
    flush_announcements();

    guard.release();
    page.doc.borrow_mut().set_attr(page.timeout, "hidden", "")?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => A11yConfig::load(Path::new(&path))
            .with_context(|| format!("failed to load config from {}", path))?,
        None => A11yConfig::default(),
    };

    tracing::info!("Starting bankui interaction demo");
    let page = build_page()?;
    registry::init(DomFocusAdapter::new(Rc::clone(&page.doc)), &config);

    bankid_modal(&page)?;
    account_tabs(&page)?;
    notification_switches(&page)?;
    loan_wizard(&page)?;
    session_timeout(&page, &config)?;

    registry::reset();
    Ok(())
}
