//! Session de travail: le dernier titre importé avec succès
//!
//! Une session est une valeur explicite passée aux opérations, jamais un
//! état global. Un nouvel import remplace entièrement le précédent; un import
//! en échec laisse la session inchangée.

use std::path::Path;

use tracing::info;

use titre_foncier::{Diagnostic, ParseResult, ParserOptions, Title, TitreFoncierError};

use crate::error::ReportError;
use crate::export::{self, GeneratedReport};
use crate::tables::ReportKind;

#[derive(Debug, Default)]
pub struct Session {
    current: Option<ParseResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace le titre courant
    pub fn load(&mut self, result: ParseResult) {
        self.replace(result);
    }

    /// Importe un export CSV et en fait le titre courant
    pub fn import(
        &mut self,
        path: &Path,
        options: &ParserOptions,
    ) -> Result<&ParseResult, TitreFoncierError> {
        let result = titre_foncier::parse(path, options)?;
        Ok(self.replace(result))
    }

    fn replace(&mut self, result: ParseResult) -> &ParseResult {
        if let Some(previous) = &self.current {
            info!(
                previous = %previous.title.titre_foncier,
                current = %result.title.titre_foncier,
                "Replacing current title"
            );
        }
        self.current.insert(result)
    }

    /// Titre courant
    ///
    /// # Errors
    ///
    /// `ReportError::NoData` si aucun import n'a réussi.
    pub fn title(&self) -> Result<&Title, ReportError> {
        self.current
            .as_ref()
            .map(|r| &r.title)
            .ok_or(ReportError::NoData)
    }

    /// Diagnostics du dernier import (vide si aucun)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.current
            .as_ref()
            .map(|r| r.diagnostics.as_slice())
            .unwrap_or_default()
    }

    pub fn current(&self) -> Option<&ParseResult> {
        self.current.as_ref()
    }

    /// Rend les tableaux demandés à partir du titre courant
    pub fn generate(&self, kinds: &[ReportKind]) -> Result<Vec<GeneratedReport>, ReportError> {
        export::generate(self.title()?, kinds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(titre: &str) -> ParseResult {
        let content = format!(
            ";Titre foncier :{}\nPropriété dite;Villa\nRDC:cotes\nA;;;1;1;10;12;Appartement;\n",
            titre
        );
        titre_foncier::parse_str(&content, &ParserOptions::default()).unwrap()
    }

    #[test]
    fn test_no_data_before_import() {
        let session = Session::new();
        assert!(matches!(session.title(), Err(ReportError::NoData)));
        assert!(matches!(
            session.generate(&[ReportKind::Voix]),
            Err(ReportError::NoData)
        ));
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_load_replaces_wholesale() {
        let mut session = Session::new();
        session.load(parsed("1/1"));
        session.load(parsed("2/2"));

        let title = session.title().unwrap();
        assert_eq!(title.titre_foncier, "2/2");
        assert_eq!(title.etages.len(), 1);
    }

    #[test]
    fn test_failed_import_keeps_previous() {
        let mut session = Session::new();
        session.load(parsed("1/1"));

        let err = session
            .import(Path::new("absent.txt"), &ParserOptions::default())
            .unwrap_err();
        assert!(matches!(err, TitreFoncierError::NotCsv(_)));
        assert_eq!(session.title().unwrap().titre_foncier, "1/1");
    }

    #[test]
    fn test_generate_from_session() {
        let mut session = Session::new();
        session.load(parsed("1/1"));
        let reports = session.generate(&[ReportKind::Voix]).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].file_name, "Voix.xlsx");
    }
}
