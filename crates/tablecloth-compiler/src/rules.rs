//! Rule compiler
//!
//! Turns the constraints of each field into an ordered list of checks and then
//! composes them into what a cell can actually carry: one data-validation rule,
//! plus an invalid-cell highlight.
//!
//! Composition:
//!
//! - `required` clears the rule's "allow blank" flag.
//! - At most one native value check becomes the rule. Lists win over numeric
//!   ranges, and among lists a foreign key wins over an enum, which wins over
//!   the implicit boolean list. Every other check is written as a formula.
//! - With no native value check, all formula checks are joined into a single
//!   custom formula rule.
//! - A numeric range only stays native when no other enforced check is left;
//!   otherwise it is written as a comparison inside the custom formula.
//! - A native list keeps its dropdown while the remaining formula checks form
//!   the column's companion formula, enforced through the highlight. With the
//!   highlight off the list is folded into the custom formula as well.

use tablecloth_core::{
    CapabilityProfile, CompiledCheck, ConstraintKind, Directive, Error, Field, FieldType,
    FormulaShape, ListOrigin, ListSource, NativeKind, Realization, Result, Table,
    ValidationRule, Value,
};

use crate::formula::{self, CellContext, Check};
use crate::layout::{ColumnLayout, TableLayout};
use crate::options::{CompileOptions, Mode};
use crate::package::{CompileWarning, CompiledColumn};
use crate::resolver::{EnumSheet, ForeignLink, LookupRegistry, TableResolution};

/// One check before composition
#[derive(Debug)]
struct Part {
    directive: Directive,
    realization: Realization,
    /// Formula forms of the check
    checks: Vec<Check>,
    /// Rule realizing the check natively, if it can stand alone
    native: Option<ValidationRule>,
    /// Whether invalid values are reported
    enforced: bool,
}

impl Part {
    fn new(directive: Directive, realization: Realization, checks: Vec<Check>) -> Self {
        Self {
            directive,
            realization,
            checks,
            native: None,
            enforced: true,
        }
    }

    fn with_native(mut self, rule: ValidationRule) -> Self {
        self.native = Some(rule);
        self
    }

    /// Rank among native rule candidates (lower wins)
    fn rank(&self) -> Option<u8> {
        self.native.as_ref()?;
        match &self.directive {
            Directive::ListCheck { origin, .. } => Some(match origin {
                ListOrigin::ForeignKey { .. } => 0,
                ListOrigin::Enum => 1,
                ListOrigin::Boolean => 2,
            }),
            Directive::RangeCheck { .. } => Some(3),
            _ => None,
        }
    }

    /// Realization once the check is written as a formula
    fn folded(&self) -> Realization {
        match (&self.realization, &self.directive) {
            (Realization::Native(_), Directive::RangeCheck { .. }) => {
                Realization::Formula(FormulaShape::Comparison)
            }
            (Realization::Native(_), Directive::ListCheck { .. }) => {
                Realization::Formula(FormulaShape::Membership)
            }
            (realization, _) => *realization,
        }
    }
}

/// Compiles the fields of laid-out tables
#[derive(Debug)]
pub struct RuleCompiler<'a> {
    options: &'a CompileOptions,
    profile: &'static CapabilityProfile,
    registry: &'a LookupRegistry,
    enum_sheet: Option<&'a EnumSheet>,
}

impl<'a> RuleCompiler<'a> {
    /// Create a rule compiler reading lookup ranges from `registry`
    pub fn new(
        options: &'a CompileOptions,
        registry: &'a LookupRegistry,
        enum_sheet: Option<&'a EnumSheet>,
    ) -> Self {
        Self {
            options,
            profile: options.profile(),
            registry,
            enum_sheet,
        }
    }

    /// Compile every field of a table
    ///
    /// Skipped constraints (best-effort mode) are appended to `warnings`.
    pub fn compile_table(
        &self,
        table: &Table,
        layout: &TableLayout,
        resolution: &TableResolution,
        warnings: &mut Vec<CompileWarning>,
    ) -> Result<Vec<CompiledColumn>> {
        table
            .fields
            .iter()
            .zip(&layout.columns)
            .enumerate()
            .map(|(i, (field, column))| {
                let links = resolution.links.get(i).map(Vec::as_slice).unwrap_or(&[]);
                let enum_column = resolution.enum_columns.get(i).copied().flatten();
                self.compile_field(table, field, layout, column, links, enum_column, warnings)
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn compile_field(
        &self,
        table: &Table,
        field: &Field,
        layout: &TableLayout,
        column: &ColumnLayout,
        links: &[ForeignLink],
        enum_column: Option<u16>,
        warnings: &mut Vec<CompileWarning>,
    ) -> Result<CompiledColumn> {
        let ctx = CellContext {
            cell: column.first_cell().to_a1_string(),
            column_range: column.data.fixed().to_a1_string(),
            row_range: layout.row_range(),
            ncols: layout.columns.len(),
        };
        let mut parts = self.gather(table, field, &layout.sheet, &ctx, links, enum_column, warnings)?;
        let mut primary = self.primary(&parts);

        // Numbers need a type test unless an enforced list or the native range pins them down
        let pinned = parts.iter().enumerate().any(|(i, p)| {
            p.enforced
                && (p.directive.is_list()
                    || (Some(i) == primary && matches!(p.directive, Directive::RangeCheck { .. })))
        });
        if field.field_type.is_numeric() && !pinned {
            if let Some(check) = formula::type_test(field.field_type, &ctx) {
                parts.insert(
                    0,
                    Part::new(
                        Directive::TypeCheck(field.field_type),
                        Realization::Formula(FormulaShape::TypeTest),
                        vec![check],
                    ),
                );
                primary = self.primary(&parts);
            }
        }

        let required = parts
            .iter()
            .any(|p| matches!(p.directive, Directive::RequiredCheck));

        let enforced: Vec<&Check> = parts
            .iter()
            .filter(|p| p.enforced)
            .flat_map(|p| p.checks.iter())
            .collect();
        let folded: Vec<&Check> = parts
            .iter()
            .enumerate()
            .filter(|&(i, p)| {
                p.enforced && Some(i) != primary && !matches!(p.directive, Directive::RequiredCheck)
            })
            .flat_map(|(_, p)| p.checks.iter())
            .collect();

        let message = if enforced.is_empty() {
            String::new()
        } else {
            formula::validation_message(&enforced)
        };
        let mut companion_formula = None;
        let rule = match primary {
            Some(i) => {
                let part = &parts[i];
                companion_formula = formula::merge_conditions(&folded, true, &ctx.cell);
                part.native.clone().map(|rule| {
                    rule.with_allow_blank(!required)
                        .with_show_error(part.enforced)
                        .with_dropdown(part.directive.is_list())
                })
            }
            None => {
                let mut formula_checks = folded.clone();
                if required {
                    formula_checks.extend(
                        parts
                            .iter()
                            .filter(|p| matches!(p.directive, Directive::RequiredCheck))
                            .flat_map(|p| p.checks.iter()),
                    );
                }
                match formula::merge_conditions(&formula_checks, true, &ctx.cell) {
                    Some(formula) => {
                        self.check_formula_len(table, field, &formula)?;
                        Some(
                            ValidationRule::custom(formula)
                                .with_allow_blank(!required)
                                .with_dropdown(false),
                        )
                    }
                    None => None,
                }
            }
        }
        .map(|rule| {
            rule.with_error_style(self.options.error_style)
                .with_message(message)
        });

        let highlight = if self.options.highlight_invalid {
            formula::merge_conditions(&enforced, false, &ctx.cell)
        } else {
            None
        };

        let checks = parts
            .iter()
            .enumerate()
            .map(|(i, p)| CompiledCheck {
                directive: p.directive.clone(),
                realization: if Some(i) == primary {
                    p.realization
                } else {
                    p.folded()
                },
            })
            .collect();

        tracing::trace!(
            "Compiled {}.{}: {:?}, highlight: {:?}",
            table.name,
            field.name,
            rule.as_ref().map(|r| r.kind.xlsx_type()),
            highlight
        );

        Ok(CompiledColumn {
            field: field.name.clone(),
            column: column.index,
            range: column.data,
            checks,
            rule,
            companion_formula,
            highlight,
        })
    }

    /// Index of the part realized as the column's native rule
    ///
    /// The best-ranked native candidate wins as long as every other enforced
    /// check still has a carrier: the rule itself for `required`, or the
    /// highlight when the candidate is a list.
    fn primary(&self, parts: &[Part]) -> Option<usize> {
        let (_, i) = parts
            .iter()
            .enumerate()
            .filter(|(_, p)| self.options.dropdowns || !p.directive.is_list())
            .filter_map(|(i, p)| p.rank().map(|rank| (rank, i)))
            .min()?;
        let alone = parts.iter().enumerate().all(|(j, p)| {
            j == i || !p.enforced || matches!(p.directive, Directive::RequiredCheck)
        });
        let highlighted = parts[i].directive.is_list() && self.options.highlight_invalid;
        (alone || highlighted).then_some(i)
    }

    /// Collect the checks of a field, in compile order
    #[allow(clippy::too_many_arguments)]
    fn gather(
        &self,
        table: &Table,
        field: &Field,
        sheet: &str,
        ctx: &CellContext,
        links: &[ForeignLink],
        enum_column: Option<u16>,
        warnings: &mut Vec<CompileWarning>,
    ) -> Result<Vec<Part>> {
        let c = &field.constraints;
        let ty = field.field_type;
        let indirect = self.profile.indirect_cross_sheet;
        let mut parts = Vec::new();

        if ty == FieldType::Boolean && c.enumeration.is_none() {
            let values = vec![Value::Boolean(true), Value::Boolean(false)];
            let realization = self.profile.boolean_list;
            let mut part = Part::new(
                Directive::ListCheck {
                    origin: ListOrigin::Boolean,
                    source: ListSource::Literal(values.clone()),
                },
                realization,
                formula::type_test(ty, ctx).into_iter().collect(),
            );
            if let Realization::Native(_) = realization {
                part = part.with_native(ValidationRule::list(ListSource::Literal(values)));
            }
            parts.push(part);
        }

        if c.required {
            if let Some(realization) = self.realize(table, field, ConstraintKind::Required, warnings)? {
                parts.push(Part::new(
                    Directive::RequiredCheck,
                    realization,
                    vec![formula::required(ctx)],
                ));
            }
        }

        if c.unique {
            if let Some(realization) = self.realize(table, field, ConstraintKind::Unique, warnings)? {
                let case_sensitive = matches!(
                    realization,
                    Realization::Formula(FormulaShape::CountMatches {
                        case_sensitive: true
                    })
                );
                parts.push(Part::new(
                    Directive::UniquenessCheck { case_sensitive },
                    realization,
                    vec![formula::unique(ctx, case_sensitive)],
                ));
            }
        }

        let mut bound = |kind: ConstraintKind, value: Option<f64>| -> Result<Option<(f64, Realization)>> {
            match value {
                Some(v) => Ok(self.realize(table, field, kind, warnings)?.map(|r| (v, r))),
                None => Ok(None),
            }
        };
        let min = bound(ConstraintKind::Minimum, c.minimum)?;
        let max = bound(ConstraintKind::Maximum, c.maximum)?;
        if let Some((_, realization)) = min.or(max) {
            let (min, max) = (min.map(|(v, _)| v), max.map(|(v, _)| v));
            let whole = ty == FieldType::Integer;
            let mut checks = Vec::new();
            checks.extend(min.map(|v| formula::minimum(ctx, v)));
            checks.extend(max.map(|v| formula::maximum(ctx, v)));
            let mut part = Part::new(Directive::RangeCheck { min, max, whole }, realization, checks);
            if let Realization::Native(NativeKind::NumberRange) = realization {
                part.native = ValidationRule::number_range(min, max, whole);
            }
            parts.push(part);
        }

        let mut length = |kind: ConstraintKind, value: Option<u32>| -> Result<Option<(u32, Realization)>> {
            match value {
                Some(v) => Ok(self.realize(table, field, kind, warnings)?.map(|r| (v, r))),
                None => Ok(None),
            }
        };
        let min = length(ConstraintKind::MinLength, c.min_length)?;
        let max = length(ConstraintKind::MaxLength, c.max_length)?;
        if let Some((_, realization)) = min.or(max) {
            let (min, max) = (min.map(|(v, _)| v), max.map(|(v, _)| v));
            let mut checks = Vec::new();
            checks.extend(min.map(|v| formula::min_length(ctx, v)));
            checks.extend(max.map(|v| formula::max_length(ctx, v)));
            parts.push(Part::new(Directive::LengthCheck { min, max }, realization, checks));
        }

        if let Some(regex) = &c.pattern {
            if let Some(realization) = self.realize(table, field, ConstraintKind::Pattern, warnings)? {
                parts.push(Part::new(
                    Directive::PatternCheck {
                        regex: regex.clone(),
                    },
                    realization,
                    vec![formula::pattern(ctx, regex)],
                ));
            }
        }

        if let Some(values) = &c.enumeration {
            if self
                .realize(table, field, ConstraintKind::Enum, warnings)?
                .is_some()
            {
                let lookup = enum_column
                    .and_then(|col| self.enum_sheet.and_then(|sheet| sheet.lookup(col)));
                let (source, realization, check) = match lookup {
                    Some(lookup) => {
                        let reference = lookup.reference_from(sheet, indirect);
                        (
                            ListSource::Range(lookup),
                            Realization::Native(NativeKind::RangeList),
                            formula::in_range(ctx, &reference, formula::one_of(values)),
                        )
                    }
                    None => (
                        ListSource::Literal(values.clone()),
                        Realization::Native(NativeKind::InlineList),
                        formula::in_literals(ctx, values),
                    ),
                };
                parts.push(
                    Part::new(
                        Directive::ListCheck {
                            origin: ListOrigin::Enum,
                            source: source.clone(),
                        },
                        realization,
                        vec![check],
                    )
                    .with_native(ValidationRule::list(source)),
                );
            }
        }

        for link in links {
            let Some(realization) = self.realize(table, field, ConstraintKind::ForeignKey, warnings)?
            else {
                continue;
            };
            let lookup = self
                .registry
                .get(&link.table, &link.field)
                .cloned()
                .ok_or_else(|| Error::UnknownReference {
                    table: table.name.clone(),
                    reference: format!("field '{}.{}'", link.table, link.field),
                })?;
            let reference = lookup.reference_from(sheet, indirect);
            let source = ListSource::Range(lookup);
            let mut part = Part::new(
                Directive::ListCheck {
                    origin: ListOrigin::ForeignKey {
                        table: link.table.clone(),
                        field: link.field.clone(),
                    },
                    source: source.clone(),
                },
                realization,
                vec![formula::in_range(
                    ctx,
                    &reference,
                    format!("in {}.{}", link.table, link.field),
                )],
            )
            .with_native(ValidationRule::list(source));
            part.enforced = self.options.validate_foreign_keys;
            parts.push(part);
        }

        Ok(parts)
    }

    /// Realization of a declared constraint, or `None` if skipped
    fn realize(
        &self,
        table: &Table,
        field: &Field,
        constraint: ConstraintKind,
        warnings: &mut Vec<CompileWarning>,
    ) -> Result<Option<Realization>> {
        let realization = self.profile.resolve(field.field_type, constraint);
        if realization.is_supported() {
            return Ok(Some(realization));
        }

        let err = Error::UnsupportedConstraint {
            table: table.name.clone(),
            field: field.name.clone(),
            constraint,
            field_type: field.field_type,
            platform: self.profile.platform,
        };
        match self.options.mode {
            Mode::Strict => Err(err),
            Mode::BestEffort => {
                tracing::warn!("{}; skipping", err);
                warnings.push(CompileWarning::Skipped(err));
                Ok(None)
            }
        }
    }

    fn check_formula_len(&self, table: &Table, field: &Field, formula: &str) -> Result<()> {
        match self.profile.max_formula_len {
            Some(max) if formula.chars().count() > max => Err(Error::ConflictingConstraint {
                table: table.name.clone(),
                field: field.name.clone(),
                reason: format!(
                    "combined validation formula is {} characters (max: {})",
                    formula.chars().count(),
                    max
                ),
            }),
            _ => Ok(()),
        }
    }
}
