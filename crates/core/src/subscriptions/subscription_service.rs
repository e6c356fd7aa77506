use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::aggregator::{aggregate, SubscriptionTotals};
use super::capabilities::{diff_tracked, Trackable};
use super::dependencies::{DerivedField, DirtySet, FieldChange, RecomputePolicy};
use super::line_onchange::{
    on_product_changed, on_product_quantity_changed, on_uom_changed, LineParent, UomDomain,
};
use super::recurrence::monthly_equivalent;
use super::subscription_model::{
    NewSubscription, NewSubscriptionLine, Subscription, SubscriptionLine, SubscriptionLineUpdate,
};
use super::subscription_traits::{CodeGenerator, SubscriptionServiceTrait};
use super::template_model::SubscriptionTemplate;
use crate::catalog::ProductCatalog;
use crate::context::RequestContext;
use crate::currency::CurrencyRounder;
use crate::errors::{Error, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::pricing::{compute_line, LinePricing, Pricelist, PricelistResolver, PricingEnv};
use crate::settings::SubscriptionSettings;
use crate::stages::{Stage, StageRegistry};
use crate::taxes::{FiscalPositionResolver, NoFiscalPositions, TaxEngine};

/// Every input of a freshly added line counts as changed.
const NEW_LINE_CHANGES: [FieldChange; 5] = [
    FieldChange::LineMembership,
    FieldChange::LineQuantity,
    FieldChange::LineUnitPrice,
    FieldChange::LineDiscount,
    FieldChange::LineTaxes,
];

/// Service computing and maintaining subscription amounts.
pub struct SubscriptionService {
    settings: SubscriptionSettings,
    tax_engine: Arc<dyn TaxEngine>,
    fiscal_positions: Arc<dyn FiscalPositionResolver>,
    pricelists: Arc<dyn PricelistResolver>,
    catalog: Arc<dyn ProductCatalog>,
    code_generator: Arc<dyn CodeGenerator>,
    stages: StageRegistry,
    event_sink: Arc<dyn DomainEventSink>,
}

impl SubscriptionService {
    pub fn new(
        tax_engine: Arc<dyn TaxEngine>,
        pricelists: Arc<dyn PricelistResolver>,
        catalog: Arc<dyn ProductCatalog>,
        code_generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        Self {
            settings: SubscriptionSettings::default(),
            tax_engine,
            fiscal_positions: Arc::new(NoFiscalPositions),
            pricelists,
            catalog,
            code_generator,
            stages: StageRegistry::default(),
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    pub fn with_settings(mut self, settings: SubscriptionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_fiscal_positions(mut self, resolver: Arc<dyn FiscalPositionResolver>) -> Self {
        self.fiscal_positions = resolver;
        self
    }

    pub fn with_stages(mut self, stages: StageRegistry) -> Self {
        self.stages = stages;
        self
    }

    /// Sets the domain event sink for this service.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn settings(&self) -> &SubscriptionSettings {
        &self.settings
    }

    pub fn stages(&self) -> &StageRegistry {
        &self.stages
    }

    /// Explicit code, then the context default, then the sequence, then the
    /// placeholder name.
    fn allocate_code(&self, ctx: &RequestContext, explicit: Option<String>) -> Result<String> {
        let not_blank = |code: &String| !code.trim().is_empty();
        if let Some(code) = explicit.filter(not_blank) {
            return Ok(code);
        }
        if let Some(code) = ctx.default_code.clone().filter(not_blank) {
            return Ok(code);
        }
        match self
            .code_generator
            .next_by_code(&self.settings.sequence_code, &ctx.company_id)?
            .filter(not_blank)
        {
            Some(code) => Ok(code),
            None => {
                warn!(
                    "Sequence '{}' gave no code for company {}, using placeholder code",
                    self.settings.sequence_code, ctx.company_id
                );
                Ok(self.settings.default_name.clone())
            }
        }
    }

    fn build_line(
        &self,
        subscription: &Subscription,
        new_line: NewSubscriptionLine,
    ) -> Result<SubscriptionLine> {
        let product = new_line
            .product_id
            .as_deref()
            .map(|id| self.catalog.get_product(id))
            .transpose()?;

        let uom = match new_line.uom_id.as_deref() {
            Some(uom_id) => Some(self.catalog.get_uom(uom_id)?),
            None => match product.as_ref().and_then(|p| p.uom.clone()) {
                Some(uom) => Some(uom),
                None => self.catalog.default_uom()?,
            },
        };

        let explicit_name = new_line.name.filter(|n| !n.trim().is_empty());
        let mut line = SubscriptionLine {
            id: new_line.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            product,
            name: String::new(),
            quantity: new_line.quantity,
            uom,
            unit_price: new_line.unit_price.unwrap_or(Decimal::ZERO),
            discount: new_line.discount,
            taxes: Vec::new(),
            price_subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
        };

        let parent = LineParent::from(subscription);
        on_product_changed(self.catalog.as_ref(), parent, &mut line)?;
        if new_line.unit_price.is_none() {
            on_product_quantity_changed(self.pricelists.as_ref(), parent, &mut line)?;
        }
        if let Some(name) = explicit_name {
            line.name = name;
        }
        if line.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(line)
    }

    fn line_index(subscription: &Subscription, line_id: &str) -> Result<usize> {
        subscription
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Line {} in subscription {}",
                    line_id, subscription.id
                ))
            })
    }

    /// Runs `change` on a copy of the subscription and commits it only when
    /// the change and the eager recompute both succeed.
    fn mutate<R>(
        &self,
        subscription: &mut Subscription,
        change: impl FnOnce(&mut Subscription) -> Result<R>,
    ) -> Result<R> {
        let before = subscription.tracked_values();
        let mut working = subscription.clone();
        let result = change(&mut working)?;

        let recomputed = match self.settings.recompute_policy {
            RecomputePolicy::Eager => self.recompute_in_place(&mut working)?,
            RecomputePolicy::Lazy => false,
        };

        *subscription = working;
        if recomputed {
            self.emit_totals(subscription);
        }
        self.emit_tracking(subscription, &before);
        Ok(result)
    }

    /// Recomputes dirty fields. Every fallible step runs before the first
    /// write, so an error leaves the subscription unchanged.
    fn recompute_in_place(&self, subscription: &mut Subscription) -> Result<bool> {
        if subscription.dirty.is_clean() {
            return Ok(false);
        }
        let dirty = subscription.dirty.clone();

        let currency = subscription.pricelist.currency.clone();
        let rounder = currency.as_ref().map(|c| c as &dyn CurrencyRounder);

        let pricings: Vec<LinePricing> = if dirty.needs_line_pass() {
            let fiscal_position = self
                .fiscal_positions
                .fiscal_position_for(&subscription.company_id, &subscription.partner)?;
            subscription
                .lines
                .iter()
                .map(|line| {
                    let env = PricingEnv {
                        tax_engine: self.tax_engine.as_ref(),
                        currency: rounder,
                        fiscal_position: fiscal_position.as_ref(),
                        product: line.product.as_ref(),
                        partner: Some(&subscription.partner),
                        discount_policy: self.settings.discount_policy,
                    };
                    compute_line(&line.pricing_input(), &env)
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            subscription
                .lines
                .iter()
                .map(|line| LinePricing {
                    subtotal: line.price_subtotal,
                    tax_amount: line.tax_amount,
                })
                .collect()
        };

        let totals = if dirty.needs_line_pass() || dirty.needs_totals_pass() {
            aggregate(&pricings, rounder)?
        } else {
            subscription.totals()
        };

        let recurring_monthly = if dirty.contains(DerivedField::RecurringMonthly) {
            monthly_equivalent(totals.recurring_total, subscription.template.as_deref())?
        } else {
            subscription.recurring_monthly
        };

        for (line, pricing) in subscription.lines.iter_mut().zip(&pricings) {
            line.price_subtotal = pricing.subtotal;
            line.tax_amount = pricing.tax_amount;
        }
        subscription.recurring_total = totals.recurring_total;
        subscription.recurring_tax = totals.recurring_tax;
        subscription.recurring_amount_total = totals.recurring_amount_total;
        subscription.recurring_monthly = recurring_monthly;
        subscription.dirty.clear();

        debug!(
            "Recomputed subscription {}: total {}, tax {}, monthly {}",
            subscription.id, totals.recurring_total, totals.recurring_tax, recurring_monthly
        );
        Ok(true)
    }

    fn mark_changes(subscription: &mut Subscription, changes: &[FieldChange]) {
        for change in changes {
            subscription.dirty.mark(*change);
        }
    }

    fn emit_totals(&self, subscription: &Subscription) {
        self.event_sink.emit(DomainEvent::totals_recomputed(
            subscription.id.clone(),
            subscription.recurring_total,
            subscription.recurring_amount_total,
            subscription.recurring_monthly,
        ));
    }

    fn emit_tracking(&self, subscription: &Subscription, before: &[(&'static str, Option<String>)]) {
        if !self.settings.track_changes {
            return;
        }
        let changes = diff_tracked(before, &subscription.tracked_values());
        if changes.is_empty() {
            return;
        }
        self.event_sink.emit(DomainEvent::fields_tracked(
            subscription.model_name().to_string(),
            subscription.record_id().to_string(),
            changes,
        ));
    }

    /// Runs a line change handler on a copy of the line and stores it back.
    fn with_line<R>(
        subscription: &mut Subscription,
        line_id: &str,
        handler: impl FnOnce(LineParent<'_>, &mut SubscriptionLine) -> Result<R>,
    ) -> Result<R> {
        let index = Self::line_index(subscription, line_id)?;
        let mut line = subscription.lines[index].clone();
        let result = handler(LineParent::from(&*subscription), &mut line)?;
        subscription.lines[index] = line;
        Ok(result)
    }
}

impl SubscriptionServiceTrait for SubscriptionService {
    fn create_subscription(
        &self,
        ctx: &RequestContext,
        new_subscription: NewSubscription,
    ) -> Result<Subscription> {
        let pricelist = match new_subscription.pricelist_id.as_deref() {
            Some(pricelist_id) => self.pricelists.get_pricelist(pricelist_id)?,
            None => self.pricelists.default_pricelist(ctx)?.ok_or_else(|| {
                Error::Validation(ValidationError::MissingField("pricelist_id".to_string()))
            })?,
        };
        if let Some(template) = new_subscription.template.as_deref() {
            template.validate()?;
        }

        let code = self.allocate_code(ctx, new_subscription.code)?;
        let name = match new_subscription.name {
            Some(name) if !name.trim().is_empty() && name != self.settings.default_name => name,
            _ => code.clone(),
        };
        let stage_id = new_subscription
            .stage_id
            .or_else(|| self.stages.default_stage().map(|s| s.id.clone()));
        let user_id = new_subscription
            .user_id
            .or_else(|| Some(ctx.user_id.clone()).filter(|u| !u.is_empty()));
        let today = ctx.today();

        let mut subscription = Subscription {
            id: new_subscription
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            code,
            name,
            description: new_subscription.description,
            company_id: ctx.company_id.clone(),
            partner: new_subscription.partner,
            pricelist,
            template: new_subscription.template,
            stage_id,
            user_id,
            team_id: new_subscription.team_id,
            analytic_account_id: new_subscription.analytic_account_id,
            tag_ids: new_subscription.tag_ids,
            date_start: new_subscription.date_start.unwrap_or(today),
            date_end: new_subscription.date_end,
            recurring_next_date: new_subscription.recurring_next_date.unwrap_or(today),
            to_renew: false,
            color: new_subscription.color,
            token: None,
            website_url: None,
            lines: Vec::with_capacity(new_subscription.lines.len()),
            recurring_total: Decimal::ZERO,
            recurring_tax: Decimal::ZERO,
            recurring_amount_total: Decimal::ZERO,
            recurring_monthly: Decimal::ZERO,
            dirty: DirtySet::all(),
        };

        for new_line in new_subscription.lines {
            let line = self.build_line(&subscription, new_line)?;
            subscription.lines.push(line);
        }
        self.recompute_in_place(&mut subscription)?;

        debug!(
            "Created subscription {} ({}) with {} lines",
            subscription.code,
            subscription.id,
            subscription.lines.len()
        );
        self.event_sink.emit(DomainEvent::subscription_created(
            subscription.id.clone(),
            subscription.code.clone(),
        ));
        Ok(subscription)
    }

    fn add_line(
        &self,
        _ctx: &RequestContext,
        subscription: &mut Subscription,
        new_line: NewSubscriptionLine,
    ) -> Result<String> {
        self.mutate(subscription, |working| {
            let line = self.build_line(working, new_line)?;
            let line_id = line.id.clone();
            working.lines.push(line);
            Self::mark_changes(working, &NEW_LINE_CHANGES);
            Ok(line_id)
        })
    }

    fn remove_line(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
    ) -> Result<SubscriptionLine> {
        self.mutate(subscription, |working| {
            let index = Self::line_index(working, line_id)?;
            let removed = working.lines.remove(index);
            Self::mark_changes(working, &[FieldChange::LineMembership]);
            Ok(removed)
        })
    }

    fn update_line(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        update: SubscriptionLineUpdate,
    ) -> Result<()> {
        self.mutate(subscription, |working| {
            let index = Self::line_index(working, line_id)?;
            let line = &mut working.lines[index];
            let mut changes = Vec::new();
            if let Some(name) = update.name {
                line.name = name;
            }
            if let Some(quantity) = update.quantity {
                line.quantity = quantity;
                changes.push(FieldChange::LineQuantity);
            }
            if let Some(unit_price) = update.unit_price {
                line.unit_price = unit_price;
                changes.push(FieldChange::LineUnitPrice);
            }
            if let Some(discount) = update.discount {
                line.discount = discount;
                changes.push(FieldChange::LineDiscount);
            }
            if let Some(taxes) = update.taxes {
                line.taxes = taxes;
                changes.push(FieldChange::LineTaxes);
            }
            Self::mark_changes(working, &changes);
            Ok(())
        })
    }

    fn change_line_product(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        product_id: Option<&str>,
    ) -> Result<UomDomain> {
        let product = product_id
            .map(|id| self.catalog.get_product(id))
            .transpose()?;
        self.mutate(subscription, |working| {
            let domain = Self::with_line(working, line_id, |parent, line| {
                line.product = product;
                line.uom = None;
                on_product_changed(self.catalog.as_ref(), parent, line)?;
                on_product_quantity_changed(self.pricelists.as_ref(), parent, line)
            })?;
            Self::mark_changes(
                working,
                &[FieldChange::LineTaxes, FieldChange::LineUnitPrice],
            );
            Ok(domain)
        })
    }

    fn change_line_quantity(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        quantity: Decimal,
    ) -> Result<UomDomain> {
        self.mutate(subscription, |working| {
            let domain = Self::with_line(working, line_id, |parent, line| {
                line.quantity = quantity;
                on_product_quantity_changed(self.pricelists.as_ref(), parent, line)
            })?;
            Self::mark_changes(
                working,
                &[FieldChange::LineQuantity, FieldChange::LineUnitPrice],
            );
            Ok(domain)
        })
    }

    fn change_line_uom(
        &self,
        subscription: &mut Subscription,
        line_id: &str,
        uom_id: Option<&str>,
    ) -> Result<UomDomain> {
        let uom = uom_id.map(|id| self.catalog.get_uom(id)).transpose()?;
        self.mutate(subscription, |working| {
            let domain = Self::with_line(working, line_id, |parent, line| {
                line.uom = uom;
                on_uom_changed(self.pricelists.as_ref(), parent, line)
            })?;
            Self::mark_changes(working, &[FieldChange::LineUnitPrice]);
            Ok(domain)
        })
    }

    fn set_template(
        &self,
        subscription: &mut Subscription,
        template: Option<Arc<SubscriptionTemplate>>,
    ) -> Result<()> {
        if let Some(template) = template.as_deref() {
            template.validate()?;
        }
        self.mutate(subscription, |working| {
            let changes = match (working.template.as_deref(), template.as_deref()) {
                (Some(old), Some(new)) if old.id == new.id => {
                    let mut changes = Vec::new();
                    if old.recurrence_interval != new.recurrence_interval {
                        changes.push(FieldChange::TemplateInterval);
                    }
                    if old.recurrence_unit != new.recurrence_unit {
                        changes.push(FieldChange::TemplateUnit);
                    }
                    changes
                }
                _ => vec![FieldChange::Template],
            };
            working.template = template;
            Self::mark_changes(working, &changes);
            Ok(())
        })
    }

    fn set_pricelist(&self, subscription: &mut Subscription, pricelist: Pricelist) -> Result<()> {
        self.mutate(subscription, |working| {
            working.pricelist = pricelist;
            Self::mark_changes(working, &[FieldChange::Pricelist]);
            Ok(())
        })
    }

    fn set_stage(&self, subscription: &mut Subscription, stage: &Stage) -> Result<()> {
        self.mutate(subscription, |working| {
            working.stage_id = Some(stage.id.clone());
            Ok(())
        })
    }

    fn recompute(&self, subscription: &mut Subscription) -> Result<()> {
        let before = subscription.tracked_values();
        if self.recompute_in_place(subscription)? {
            self.emit_totals(subscription);
            self.emit_tracking(subscription, &before);
        }
        Ok(())
    }

    fn totals(&self, subscription: &mut Subscription) -> Result<SubscriptionTotals> {
        self.recompute(subscription)?;
        Ok(subscription.totals())
    }

    fn recurring_monthly(&self, subscription: &mut Subscription) -> Result<Decimal> {
        self.recompute(subscription)?;
        Ok(subscription.recurring_monthly)
    }
}
