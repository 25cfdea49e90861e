//! Machine à états qui reconstruit la hiérarchie titre → étages → lots
//!
//! Les exports n'ont pas de schéma: seuls des marqueurs textuels
//! ("Titre foncier", "Propriété dite", "Nom : cotes", "Total") délimitent les
//! sections. Chaque ligne fait avancer la machine d'un pas:
//!
//! ```text
//! SeekTitle ──"Titre foncier"──▶ SeekHeader ──"Propriété dite"──▶ SkipHeader(n)
//!                                                                     │
//!            ┌────────────── "Total" ◀──────────┐                     ▼
//!            ▼                                  │
//!        SeekFloor ──en-tête d'étage──▶ InFloor ─┘ (lots, lignes vides)
//!                                        ▲    │
//!                                        └────┘ nouvel en-tête d'étage
//! ```

mod lot;

use tracing::{debug, warn};

use crate::layout::{ColumnLayout, ParserOptions};
use crate::types::{Diagnostic, DiagnosticKind, Floor, Lot, ParseResult, Severity, Title};

use lot::cell;

const TITLE_MARKER: &str = "Titre foncier";
const HEADER_MARKER: &str = "Propriété dite";
const TOTAL_MARKER: &str = "Total";

/// Étage en cours de lecture
#[derive(Debug)]
struct FloorDraft {
    nom: String,
    cotes: String,
    line: usize,
    lots: Vec<Lot>,
}

#[derive(Debug)]
enum State {
    SeekTitle,
    SeekHeader,
    SkipHeader { remaining: usize },
    SeekFloor,
    InFloor(FloorDraft),
}

struct RowParser {
    columns: ColumnLayout,
    header_skip: usize,
    state: State,
    title: Title,
    diagnostics: Vec<Diagnostic>,
}

/// Parse une suite de lignes (déjà découpées en cellules).
///
/// Ne retourne jamais d'erreur: les lignes malformées sont écartées et
/// tracées dans [`ParseResult::diagnostics`]. Un fichier sans aucun étage
/// produit un titre sans étage.
pub fn parse_rows(rows: &[Vec<String>], options: &ParserOptions) -> ParseResult {
    let mut parser = RowParser {
        columns: options.columns(),
        header_skip: options.header_skip.max(1),
        state: State::SeekTitle,
        title: Title::default(),
        diagnostics: Vec::new(),
    };

    for (index, row) in rows.iter().enumerate() {
        parser.step(index + 1, row);
    }

    parser.finish()
}

/// Vrai si toutes les cellules sont vides ou blanches
fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

impl RowParser {
    fn step(&mut self, line: usize, row: &[String]) {
        let state = std::mem::replace(&mut self.state, State::SeekFloor);

        self.state = match state {
            State::SeekTitle => {
                let label = cell(row, self.columns.title_label);
                if label.contains(TITLE_MARKER) {
                    // "Modification successives du Titre foncier  :154311 /05"
                    self.title.titre_foncier =
                        label.rsplit(':').next().unwrap_or("").trim().to_string();
                    debug!(line, titre = %self.title.titre_foncier, "Title found");
                    State::SeekHeader
                } else {
                    State::SeekTitle
                }
            }
            State::SeekHeader => {
                let label_index = self.columns.header_label;
                if cell(row, label_index).contains(HEADER_MARKER) {
                    self.title.propriete_nom = cell(row, label_index + 1).trim().to_string();
                    Self::skip(self.header_skip - 1)
                } else {
                    State::SeekHeader
                }
            }
            State::SkipHeader { remaining } => Self::skip(remaining - 1),
            State::SeekFloor => match self.floor_header(line, row) {
                Some(draft) => State::InFloor(draft),
                None => State::SeekFloor,
            },
            State::InFloor(mut draft) => {
                if let Some(next) = self.floor_header(line, row) {
                    self.close(draft);
                    State::InFloor(next)
                } else if is_blank(row) {
                    State::InFloor(draft)
                } else if cell(row, self.columns.total_label).contains(TOTAL_MARKER) {
                    self.close(draft);
                    State::SeekFloor
                } else {
                    if self.is_lot_row(row) {
                        self.read_lot(line, row, &mut draft);
                    }
                    State::InFloor(draft)
                }
            }
        };
    }

    fn skip(remaining: usize) -> State {
        if remaining == 0 {
            State::SeekFloor
        } else {
            State::SkipHeader { remaining }
        }
    }

    /// En-tête d'étage: libellé avec ':' et au moins une lettre
    fn floor_header(&self, line: usize, row: &[String]) -> Option<FloorDraft> {
        let label = cell(row, self.columns.floor_label);
        if !label.chars().any(char::is_alphabetic) {
            return None;
        }
        let (nom, cotes) = label.split_once(':')?;
        Some(FloorDraft {
            nom: nom.trim().to_string(),
            cotes: cotes.trim().to_string(),
            line,
            lots: Vec::new(),
        })
    }

    /// Ligne de lot: assez de cellules et un indice commun non vide
    fn is_lot_row(&self, row: &[String]) -> bool {
        row.get(self.columns.indice_commune)
            .map_or(false, |c| !c.is_empty())
    }

    fn read_lot(&mut self, line: usize, row: &[String], draft: &mut FloorDraft) {
        let mut warnings = Vec::new();
        match lot::extract(row, &self.columns, line, &mut warnings) {
            Ok(lot) => draft.lots.push(lot),
            Err(diagnostic) => {
                warn!(line, floor = %draft.nom, "Skipping lot row: {}", diagnostic.kind);
                self.diagnostics.push(diagnostic);
            }
        }
        for warning in warnings {
            debug!(line, floor = %draft.nom, "{}", warning.kind);
            self.diagnostics.push(warning);
        }
    }

    /// Termine un étage; un étage sans lot est écarté
    fn close(&mut self, draft: FloorDraft) {
        if draft.lots.is_empty() {
            debug!(line = draft.line, floor = %draft.nom, "Dropping floor without lots");
            self.diagnostics.push(Diagnostic::skipped(
                draft.line,
                DiagnosticKind::EmptyFloor { nom: draft.nom },
            ));
            return;
        }
        self.title
            .etages
            .push(Floor::new(draft.nom, draft.cotes, draft.lots));
    }

    fn finish(mut self) -> ParseResult {
        match std::mem::replace(&mut self.state, State::SeekFloor) {
            State::InFloor(draft) => self.close(draft),
            State::SeekTitle => {
                warn!("No \"{}\" marker found", TITLE_MARKER);
                self.diagnostics
                    .push(Diagnostic::warning(0, DiagnosticKind::TitleNotFound));
            }
            State::SeekHeader => {
                warn!("No \"{}\" marker found", HEADER_MARKER);
                self.diagnostics
                    .push(Diagnostic::warning(0, DiagnosticKind::HeaderNotFound));
            }
            State::SkipHeader { .. } | State::SeekFloor => {}
        }

        // Diagnostics triés par ligne, les anomalies globales en tête
        self.diagnostics.sort_by_key(|d| d.row);

        debug!(
            floors = self.title.etages.len(),
            lots = self.title.lot_count(),
            skipped = self
                .diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Skipped)
                .count(),
            "Rows parsed"
        );

        ParseResult {
            title: self.title,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutVariant;
    use crate::types::SurfaceField;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn rows(lines: &[&str]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|l| l.split(';').map(str::to_string).collect())
            .collect()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const PREAMBLE: [&str; 4] = [
        ";Modification successives du Titre foncier  :154311 /05",
        "",
        "Propriété dite;Résidence Les Palmiers",
        "Propriété;Titre N°;;Indice privatif;Indice commun;Surface;Surplomb;Consistance;Obs",
    ];

    fn with_preamble(body: &[&'static str]) -> Vec<Vec<String>> {
        let mut lines: Vec<&str> = PREAMBLE.to_vec();
        lines.extend_from_slice(body);
        rows(&lines)
    }

    #[test]
    fn test_parse_title_and_property() {
        let result = parse_rows(&with_preamble(&[]), &ParserOptions::default());
        assert_eq!(result.title.titre_foncier, "154311 /05");
        assert_eq!(result.title.propriete_nom, "Résidence Les Palmiers");
        assert!(result.title.etages.is_empty());
    }

    #[test]
    fn test_parse_single_floor() {
        let input = with_preamble(&[
            "Rez-de-chaussée:Des côtes +0.10m à 4,10m",
            "Appartement;154311/05;;12a;12;50.5;55.0;Appartement;",
            ";Total;;;;50.5;55.0;;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());

        assert_eq!(result.title.etages.len(), 1);
        let floor = &result.title.etages[0];
        assert_eq!(floor.nom, "Rez-de-chaussée");
        assert_eq!(floor.cotes, "Des côtes +0.10m à 4,10m");
        assert_eq!(floor.lots.len(), 1);
        assert_eq!(floor.total_surface_interieure, dec("50.5"));
        assert_eq!(floor.total_surface_avec_surplomb, dec("55.0"));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_floor_without_lots_is_dropped() {
        let input = with_preamble(&[
            "Sous-sol:De la cote -3m à 0m",
            "Rez-de-chaussée:De la cote 0m à 4m",
            "Commerce;;;1;1;80;90;Local Commercial;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());

        assert_eq!(result.title.etages.len(), 1);
        assert_eq!(result.title.etages[0].nom, "Rez-de-chaussée");
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::skipped(
                5,
                DiagnosticKind::EmptyFloor {
                    nom: "Sous-sol".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_blank_rows_do_not_close_floor() {
        let input = with_preamble(&[
            "Premier Etage:De la cote 4m à 7m",
            "A;;;1;1;40;40;Appartement;",
            ";;;;;;;;",
            "",
            "B;;;2;2;60;60;Appartement;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());
        assert_eq!(result.title.etages[0].lots.len(), 2);
    }

    #[test]
    fn test_total_row_closes_floor() {
        let input = with_preamble(&[
            "Premier Etage:De la cote 4m à 7m",
            "A;;;1;1;40;40;Appartement;",
            ";Total;;;;40;40;;",
            // Hors étage: ignorée
            "B;;;2;2;60;60;Appartement;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());
        assert_eq!(result.title.etages.len(), 1);
        assert_eq!(result.title.etages[0].lots.len(), 1);
    }

    #[test]
    fn test_rows_without_indices_are_excluded() {
        let input = with_preamble(&[
            "Premier Etage:De la cote 4m à 7m",
            // Indice commun vide: pas une ligne de lot
            "Palier;;;;;5;5;Dégagement;",
            // Indices blancs: ligne de lot écartée
            "Palier;;; ; ;5;5;Dégagement;",
            "A;;;1;1;40;40;Appartement;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());

        let floor = &result.title.etages[0];
        assert_eq!(floor.lots.len(), 1);
        assert!(floor
            .lots
            .iter()
            .all(|l| l.indice_privative.is_some() || l.indice_commune.is_some()));
        assert_eq!(result.skipped().count(), 1);
        assert_eq!(result.skipped().next().unwrap().row, 7);
    }

    #[test]
    fn test_malformed_surface_drops_row() {
        let input = with_preamble(&[
            "Premier Etage:De la cote 4m à 7m",
            "A;;;1;1;abc;40;Appartement;",
            "B;;;2;2;60;60;Appartement;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());

        let floor = &result.title.etages[0];
        assert_eq!(floor.lots.len(), 1);
        assert_eq!(floor.lots[0].indice_privative.as_deref(), Some("2"));
        assert_eq!(floor.total_surface_interieure, dec("60"));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::skipped(
                6,
                DiagnosticKind::InvalidNumber {
                    field: SurfaceField::Interieure,
                    value: "abc".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_oversized_surfaces_are_dropped() {
        let input = with_preamble(&[
            "Premier Etage:De la cote 4m à 7m",
            "A;;;1;1;5e28;5e28;Appartement;",
            "B;;;2;2;5e28;5e28;Appartement;",
            "C;;;3;3;1000000000000000;1000000000000000;Appartement;",
            "D;;;4;4;30;30;Appartement;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());

        let floor = &result.title.etages[0];
        assert_eq!(floor.lots.len(), 1);
        assert_eq!(floor.total_surface_avec_surplomb, dec("30"));
        assert_eq!(result.skipped().count(), 3);
        assert!(result.skipped().all(|d| matches!(
            d.kind,
            DiagnosticKind::SurfaceOutOfRange {
                field: SurfaceField::Interieure,
                ..
            }
        )));
    }

    #[test]
    fn test_common_only_lot_counts_in_floor_totals() {
        let input = with_preamble(&[
            "Premier Etage:De la cote 4m à 7m",
            "A;;;1;1;40;45;Appartement;",
            "Communs;;;;c1;10;12;Parties communes;",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());

        let floor = &result.title.etages[0];
        assert_eq!(floor.lots.len(), 2);
        assert_eq!(floor.private_lots().count(), 1);
        assert_eq!(floor.total_surface_interieure, dec("50"));
        assert_eq!(floor.total_surface_avec_surplomb, dec("57"));
    }

    #[test]
    fn test_header_skip_three_rows() {
        // La ligne d'en-têtes contient "Surface: m²", qui ressemble à un étage
        let input = rows(&[
            ";Titre foncier : 99/01",
            "Propriété dite;Villa",
            "Surface: m²;;",
            "Unités: m²;;",
            "Rez-de-chaussée:cotes",
            "A;;;1;1;10;10;Appartement;",
        ]);
        let options = ParserOptions {
            header_skip: 3,
            ..ParserOptions::default()
        };
        let result = parse_rows(&input, &options);
        assert_eq!(result.title.etages.len(), 1);
        assert_eq!(result.title.etages[0].nom, "Rez-de-chaussée");

        // Avec le saut par défaut, les en-têtes deviennent des étages vides
        let default = parse_rows(&input, &ParserOptions::default());
        assert_eq!(default.title.etages.len(), 1);
        assert_eq!(default.skipped().count(), 2);
    }

    #[test]
    fn test_shifted_layout() {
        let input = rows(&[
            ";;Titre foncier : 12/34",
            ";Propriété dite;Villa",
            ";Rez-de-chaussée:cotes",
            ";A;;;1;1;10;12;Appartement;",
            ";;Total;;;;10;12;;",
        ]);
        let options = ParserOptions {
            layout: LayoutVariant::Shifted,
            ..ParserOptions::default()
        };
        let result = parse_rows(&input, &options);

        assert_eq!(result.title.titre_foncier, "12/34");
        assert_eq!(result.title.propriete_nom, "Villa");
        assert_eq!(result.title.etages.len(), 1);
        assert_eq!(
            result.title.etages[0].lots[0].surface_avec_surplomb,
            dec("12")
        );
    }

    #[test]
    fn test_no_title_marker() {
        let input = rows(&["Rez-de-chaussée:cotes", "A;;;1;1;10;10;Appartement;"]);
        let result = parse_rows(&input, &ParserOptions::default());

        assert_eq!(result.title, Title::default());
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::warning(0, DiagnosticKind::TitleNotFound)]
        );
    }

    #[test]
    fn test_floor_header_requires_letter_and_colon() {
        let input = with_preamble(&[
            "12:30",
            "Rez-de-chaussée:cotes",
            "A;;;1;1;10;10;Appartement;",
            "Sans deux-points",
        ]);
        let result = parse_rows(&input, &ParserOptions::default());
        assert_eq!(result.title.etages.len(), 1);
        assert_eq!(result.title.etages[0].lots.len(), 1);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input = with_preamble(&[
            "Rez-de-chaussée:cotes",
            "A;;;1;1;10;10;Appartement;",
            "B;;;2;2;x;10;Appartement;",
        ]);
        let first = parse_rows(&input, &ParserOptions::default());
        let second = parse_rows(&input, &ParserOptions::default());
        assert_eq!(first, second);
    }
}
