use crate::error::Result;
use crate::models::{DetailFields, Evaluation, RawListing};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

/// How an insert behaves when the detail link already exists in the
/// table. The pipeline uses `IgnoreDuplicates`: a later crawl of the
/// same listing never updates the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    IgnoreDuplicates,
    Upsert,
}

/// One row of the `imoveis` table.
#[derive(Debug, Clone)]
pub struct StoredProperty {
    pub listing: RawListing,
    pub evaluation: Evaluation,
    pub evaluated_at: String,
}

pub struct PropertyStore {
    conn: Connection,
}

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS imoveis (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    titulo TEXT,
    preco TEXT,
    localidade_pagina_principal TEXT,
    numero_leilao TEXT,
    link_detalhes TEXT UNIQUE,
    localizacao_detalhada TEXT,
    vara TEXT,
    forum TEXT,
    leiloeiro TEXT,
    descricao_completa TEXT,
    condicoes_pagamento TEXT,
    pontuacao_ollama INTEGER,
    pontos_positivos TEXT,
    pontos_negativos TEXT,
    data_avaliacao TEXT DEFAULT CURRENT_TIMESTAMP
)";

const INSERT_COLUMNS: &str = "titulo, preco, localidade_pagina_principal, numero_leilao, \
    link_detalhes, localizacao_detalhada, vara, forum, leiloeiro, descricao_completa, \
    condicoes_pagamento, pontuacao_ollama, pontos_positivos, pontos_negativos";

const UPSERT_CLAUSE: &str = "ON CONFLICT(link_detalhes) DO UPDATE SET
    titulo = excluded.titulo,
    preco = excluded.preco,
    localidade_pagina_principal = excluded.localidade_pagina_principal,
    numero_leilao = excluded.numero_leilao,
    localizacao_detalhada = excluded.localizacao_detalhada,
    vara = excluded.vara,
    forum = excluded.forum,
    leiloeiro = excluded.leiloeiro,
    descricao_completa = excluded.descricao_completa,
    condicoes_pagamento = excluded.condicoes_pagamento,
    pontuacao_ollama = excluded.pontuacao_ollama,
    pontos_positivos = excluded.pontos_positivos,
    pontos_negativos = excluded.pontos_negativos,
    data_avaliacao = CURRENT_TIMESTAMP";

impl PropertyStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self { conn })
    }

    /// Writes one evaluated listing. Returns whether a row was written;
    /// a duplicate detail link under `IgnoreDuplicates` is not an error.
    pub fn insert(
        &self,
        listing: &RawListing,
        evaluation: &Evaluation,
        policy: ConflictPolicy,
    ) -> Result<bool> {
        let sql = match policy {
            ConflictPolicy::IgnoreDuplicates => format!(
                "INSERT OR IGNORE INTO imoveis ({INSERT_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ),
            ConflictPolicy::Upsert => format!(
                "INSERT INTO imoveis ({INSERT_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14) \
                 {UPSERT_CLAUSE}"
            ),
        };

        let written = self.conn.execute(
            &sql,
            params![
                listing.title,
                listing.price,
                listing.locality,
                listing.auction_number,
                listing.detail_link,
                listing.details.detailed_locality,
                listing.details.court,
                listing.details.forum,
                listing.details.auctioneer,
                listing.details.full_description,
                listing.details.payment_terms,
                evaluation.score,
                evaluation.positives,
                evaluation.negatives,
            ],
        )? > 0;

        if written {
            info!("Stored '{}' (score {})", listing.title, evaluation.score);
        } else {
            info!("'{}' already stored, skipping", listing.title);
        }

        Ok(written)
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM imoveis", [], |row| row.get(0))?)
    }

    pub fn all(&self) -> Result<Vec<StoredProperty>> {
        let mut stmt = self.conn.prepare(
            "SELECT titulo, preco, localidade_pagina_principal, numero_leilao, link_detalhes, \
             localizacao_detalhada, vara, forum, leiloeiro, descricao_completa, \
             condicoes_pagamento, pontuacao_ollama, pontos_positivos, pontos_negativos, \
             data_avaliacao FROM imoveis ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StoredProperty {
                listing: RawListing {
                    title: row.get(0)?,
                    price: row.get(1)?,
                    locality: row.get(2)?,
                    auction_number: row.get(3)?,
                    detail_link: row.get(4)?,
                    details: DetailFields {
                        detailed_locality: row.get(5)?,
                        court: row.get(6)?,
                        forum: row.get(7)?,
                        auctioneer: row.get(8)?,
                        full_description: row.get(9)?,
                        payment_terms: row.get(10)?,
                    },
                },
                evaluation: Evaluation {
                    score: row.get(11)?,
                    positives: row.get(12)?,
                    negatives: row.get(13)?,
                },
                evaluated_at: row.get(14)?,
            })
        })?;

        let mut properties = Vec::new();
        for row in rows {
            properties.push(row?);
        }
        Ok(properties)
    }
}
