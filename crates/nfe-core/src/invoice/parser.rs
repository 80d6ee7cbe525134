//! NFe document parser.

use tracing::{debug, info};

use super::rules::{parse_quantity, read_traceability};
use super::{InvoiceParser, Result};
use crate::error::ExtractionError;
use crate::models::config::{ExtractionConfig, NFE_KEY_PREFIX, NFE_NAMESPACE};
use crate::models::invoice::{Invoice, LineItem};
use crate::xml::Element;

const INVOICE_INFO_PATH: [&str; 2] = ["NFe", "infNFe"];

/// Parser for NFe invoice documents.
///
/// The `NFe/infNFe` pair is looked up below the root, so a wrapper such as
/// `nfeProc` is expected; a document rooted at `NFe` holds no invoice.
#[derive(Debug, Clone)]
pub struct NfeParser {
    /// Namespace URI the NFe elements are bound to.
    namespace: String,
    /// Prefix removed from `infNFe/@Id` to form the key.
    key_prefix: String,
}

impl NfeParser {
    /// Create a parser for the standard NFe namespace.
    pub fn new() -> Self {
        Self {
            namespace: NFE_NAMESPACE.to_string(),
            key_prefix: NFE_KEY_PREFIX.to_string(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_namespace(&config.namespace)
            .with_key_prefix(&config.key_prefix)
    }

    /// Set the namespace URI.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn required_text(&self, parent: &Element, path: &[&str]) -> std::result::Result<String, ExtractionError> {
        parent
            .find(&self.namespace, path)
            .map(|el| el.text().to_string())
            .ok_or_else(|| ExtractionError::MissingField(path.join("/")))
    }

    fn invoice_key(&self, info: &Element) -> std::result::Result<String, ExtractionError> {
        let id = info
            .attribute("Id")
            .ok_or_else(|| ExtractionError::MissingAttribute {
                element: "infNFe".to_string(),
                attribute: "Id".to_string(),
            })?;

        if self.key_prefix.is_empty() {
            return Ok(id.to_string());
        }
        Ok(id.replace(&self.key_prefix, ""))
    }

    fn parse_item(&self, det: &Element) -> std::result::Result<LineItem, ExtractionError> {
        let ns = self.namespace.as_str();
        let product = self.required_text(det, &["prod", "xProd"])?;
        let quantity = parse_quantity(&self.required_text(det, &["prod", "qCom"])?)?;
        let additional_info = det.child(ns, "infAdProd").map(|el| el.text().to_string());

        let mut traceability = Vec::new();
        for prod in det.children_named(ns, "prod") {
            traceability.extend(read_traceability(prod, ns)?);
        }

        Ok(LineItem {
            product,
            quantity,
            additional_info,
            traceability,
        })
    }
}

impl Default for NfeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for NfeParser {
    fn parse_element(&self, root: &Element) -> Result<Option<Invoice>> {
        let Some(info) = root.find_descendant(&self.namespace, &INVOICE_INFO_PATH) else {
            debug!(root = root.name(), "no NFe/infNFe element, not an invoice");
            return Ok(None);
        };

        let number = self.required_text(info, &["ide", "nNF"])?;
        let series = self.required_text(info, &["ide", "serie"])?;
        let operation_nature = self.required_text(info, &["ide", "natOp"])?;
        let key = self.invoice_key(info)?;
        let issuer = self.required_text(info, &["emit", "xNome"])?;

        let items = info
            .children_named(&self.namespace, "det")
            .map(|det| self.parse_item(det))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(number = %number, key = %key, items = items.len(), "parsed invoice");

        Ok(Some(Invoice {
            number,
            series,
            operation_nature,
            key,
            issuer,
            items,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NfeError;
    use crate::models::invoice::TraceabilityRecord;
    use pretty_assertions::assert_eq;

    fn nfe(ide: &str, dets: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe>
    <infNFe Id="NFe35240112345678000190550010000012341000012345" versao="4.00">
      <ide>{ide}</ide>
      <emit><CNPJ>12345678000190</CNPJ><xNome>FARMA DISTRIBUIDORA LTDA</xNome></emit>
      {dets}
    </infNFe>
  </NFe>
</nfeProc>"#
        )
    }

    const IDE: &str = "<natOp>VENDA DE MERCADORIA</natOp><serie>1</serie><nNF>1234</nNF>";

    #[test]
    fn test_parses_header() {
        let invoice = NfeParser::new().parse(&nfe(IDE, "")).unwrap().unwrap();

        assert_eq!(invoice.number, "1234");
        assert_eq!(invoice.series, "1");
        assert_eq!(invoice.operation_nature, "VENDA DE MERCADORIA");
        assert_eq!(invoice.key, "35240112345678000190550010000012341000012345");
        assert_eq!(invoice.issuer, "FARMA DISTRIBUIDORA LTDA");
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn test_parses_items_in_order() {
        let dets = r#"
            <det nItem="1">
              <prod><xProd>AMOXICILINA</xProd><qCom>12.7500</qCom>
                <rastro><nLote>R1</nLote><dVal>2026-01-31</dVal></rastro>
              </prod>
              <infAdProd>LOTE: F1 VAL: 01/02/2026</infAdProd>
            </det>
            <det nItem="2">
              <prod><xProd>IBUPROFENO</xProd><qCom>3</qCom></prod>
            </det>"#;
        let invoice = NfeParser::new().parse(&nfe(IDE, dets)).unwrap().unwrap();

        assert_eq!(invoice.items.len(), 2);
        let first = &invoice.items[0];
        assert_eq!(first.product, "AMOXICILINA");
        assert_eq!(first.quantity, 12);
        assert_eq!(first.additional_info.as_deref(), Some("LOTE: F1 VAL: 01/02/2026"));
        assert_eq!(
            first.traceability,
            vec![TraceabilityRecord {
                batch: "R1".to_string(),
                expiry: "2026-01-31".to_string(),
            }]
        );
        assert_eq!(invoice.items[1].additional_info, None);
        assert_eq!(invoice.items[1].quantity, 3);
    }

    #[test]
    fn test_bare_nfe_root_is_not_an_invoice() {
        let xml = r#"<NFe xmlns="http://www.portalfiscal.inf.br/nfe">
            <infNFe Id="NFe999"><ide><natOp>X</natOp><serie>2</serie><nNF>9</nNF></ide>
            <emit><xNome>Y</xNome></emit></infNFe></NFe>"#;

        assert!(NfeParser::new().parse(xml).unwrap().is_none());
    }

    #[test]
    fn test_deeply_wrapped_nfe() {
        let xml = r#"<lote xmlns="http://www.portalfiscal.inf.br/nfe"><enviNFe><NFe>
            <infNFe Id="NFe999"><ide><natOp>X</natOp><serie>2</serie><nNF>9</nNF></ide>
            <emit><xNome>Y</xNome></emit></infNFe></NFe></enviNFe></lote>"#;

        let invoice = NfeParser::new().parse(xml).unwrap().unwrap();
        assert_eq!(invoice.key, "999");
        assert_eq!(invoice.series, "2");
    }

    #[test]
    fn test_not_an_invoice() {
        let xml = r#"<procEventoNFe xmlns="http://www.portalfiscal.inf.br/nfe"><evento/></procEventoNFe>"#;
        assert!(NfeParser::new().parse(xml).unwrap().is_none());
    }

    #[test]
    fn test_wrong_namespace_is_not_an_invoice() {
        let xml = r#"<nfeProc xmlns="urn:other"><NFe><infNFe Id="NFe1"/></NFe></nfeProc>"#;
        assert!(NfeParser::new().parse(xml).unwrap().is_none());
    }

    #[test]
    fn test_custom_namespace() {
        let xml = r#"<nfeProc xmlns="urn:other"><NFe><infNFe Id="NFe1">
            <ide><natOp>A</natOp><serie>1</serie><nNF>1</nNF></ide><emit><xNome>B</xNome></emit>
            </infNFe></NFe></nfeProc>"#;
        let parser = NfeParser::new().with_namespace("urn:other");
        assert!(parser.parse(xml).unwrap().is_some());
    }

    #[test]
    fn test_missing_header_field_is_fatal() {
        let ide = "<natOp>VENDA</natOp><nNF>1</nNF>";
        let err = NfeParser::new().parse(&nfe(ide, "")).unwrap_err();

        assert!(matches!(
            err,
            NfeError::Extraction(ExtractionError::MissingField(ref path)) if path == "ide/serie"
        ));
    }

    #[test]
    fn test_missing_id_attribute_is_fatal() {
        let xml = r#"<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe"><NFe><infNFe>
            <ide><natOp>X</natOp><serie>2</serie><nNF>9</nNF></ide></infNFe></NFe></nfeProc>"#;
        let err = NfeParser::new().parse(xml).unwrap_err();

        assert!(matches!(
            err,
            NfeError::Extraction(ExtractionError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_malformed_traceability_is_fatal() {
        let dets = "<det><prod><xProd>P</xProd><qCom>1</qCom><rastro><nLote>L</nLote></rastro></prod></det>";
        let err = NfeParser::new().parse(&nfe(IDE, dets)).unwrap_err();

        assert!(matches!(
            err,
            NfeError::Extraction(ExtractionError::MissingTraceField { .. })
        ));
    }

    #[test]
    fn test_bad_quantity_is_fatal() {
        let dets = "<det><prod><xProd>P</xProd><qCom>muitos</qCom></prod></det>";
        let err = NfeParser::new().parse(&nfe(IDE, dets)).unwrap_err();

        assert!(matches!(err, NfeError::Extraction(ExtractionError::Parse { .. })));
    }

    #[test]
    fn test_malformed_xml_is_xml_error() {
        let err = NfeParser::new().parse("<nfeProc><NFe></nfeProc>").unwrap_err();
        assert!(matches!(err, NfeError::Xml(_)));
    }
}
