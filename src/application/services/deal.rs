//! Deal board service
//!
//! Every operation loads the board, applies one domain change and saves it
//! back. All of them act for the logged-in buyer.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::SessionConfig;
use crate::domain::{Deal, DealBoard, DealStatus, Document};
use crate::infrastructure::traits::{DealStore, FileSystem};

pub struct DealService {
    store: Arc<dyn DealStore>,
    fs: Arc<dyn FileSystem>,
}

impl DealService {
    pub fn new(store: Arc<dyn DealStore>, fs: Arc<dyn FileSystem>) -> Self {
        Self { store, fs }
    }

    pub fn board(&self, session: &SessionConfig) -> ApplicationResult<DealBoard> {
        session.require_auth()?;
        let deals = self
            .store
            .load()
            .with_context(format!("load deals: {}", self.store.location()))?;
        debug!("loaded {} deals", deals.len());
        Ok(DealBoard::new(deals))
    }

    fn store_board(&self, board: DealBoard) -> ApplicationResult<()> {
        self.store
            .save(board.deals())
            .with_context(format!("save deals: {}", self.store.location()))
    }

    /// Deals on one tab matching `query`, plus the count of every tab.
    pub fn list(
        &self,
        session: &SessionConfig,
        status: DealStatus,
        query: &str,
    ) -> ApplicationResult<(Vec<Deal>, Vec<(DealStatus, usize)>)> {
        let board = self.board(session)?;
        let counts = DealStatus::ALL
            .iter()
            .map(|&s| (s, board.count_by_status(s)))
            .collect();
        let shown = board.filter(status, query).into_iter().cloned().collect();
        Ok((shown, counts))
    }

    #[instrument(level = "debug", skip(self, session))]
    pub fn pass(&self, session: &SessionConfig, id: &str) -> ApplicationResult<Deal> {
        let mut board = self.board(session)?;
        board.pass(id)?;
        let deal = board.get(id)?.clone();
        self.store_board(board)?;
        info!("passed on deal {}", id);
        Ok(deal)
    }

    #[instrument(level = "debug", skip(self, session))]
    pub fn approve(&self, session: &SessionConfig, id: &str) -> ApplicationResult<Deal> {
        let mut board = self.board(session)?;
        board.approve_terms(id)?;
        let deal = board.get(id)?.clone();
        self.store_board(board)?;
        info!("approved terms for deal {}", id);
        Ok(deal)
    }

    /// Attach a local file to a deal. The document is named after the file
    /// and links to its path.
    #[instrument(level = "debug", skip(self, session))]
    pub fn upload(&self, session: &SessionConfig, id: &str, file: &Path) -> ApplicationResult<Document> {
        let mut board = self.board(session)?;
        if !self.fs.is_file(file) {
            return Err(ApplicationError::MissingInput {
                path: file.to_path_buf(),
            });
        }
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let document = board.add_document(id, &name, &file.display().to_string())?;
        self.store_board(board)?;
        Ok(document)
    }

    pub fn remove_document(
        &self,
        session: &SessionConfig,
        id: &str,
        document_id: &str,
    ) -> ApplicationResult<Document> {
        let mut board = self.board(session)?;
        let document = board.remove_document(id, document_id)?;
        self.store_board(board)?;
        Ok(document)
    }
}
