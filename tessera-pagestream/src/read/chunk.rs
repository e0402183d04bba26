//! The column-chunk reader: drives the page sequence and owns the
//! dictionary.

use std::io::{Read, Seek};
use std::sync::Arc;

use tessera_common::{error::Error, Result};
use tessera_format::chunk::ChunkMetaData;
use tessera_format::page::PageKind;
use tessera_format::schema::{ColumnDescriptor, Repetition};

use super::codec::CodecRegistry;
use super::data_page::{DataPage, ReadBatch};
use super::dictionary_page::DictionaryPage;
use super::header::PageHeaderDecoder;
use super::levels::{level_bit_width, LevelFactory};
use super::offset_reader::OffsetReader;
use super::values::Value;

/// Reads one column chunk as a sequence of decoded batches.
///
/// The reader walks the chunk's pages in storage order: an optional
/// dictionary page (materialized eagerly and held for the lifetime of the
/// chunk), then data pages created just in time and dropped once exhausted.
/// When the active page runs dry the reader advances to the next one within
/// the same call, so an empty batch always means end of chunk.
///
/// All errors are fatal to the reader; callers must discard it after the
/// first failure.
pub struct ColumnChunkReader<R> {
    column: ColumnDescriptor,
    chunk: ChunkMetaData,
    reader: OffsetReader<R>,
    headers: Arc<dyn PageHeaderDecoder>,
    codecs: Arc<dyn CodecRegistry>,
    d_factory: LevelFactory,
    r_factory: LevelFactory,
    dictionary: Option<Arc<[Value]>>,
    active_page: Option<DataPage>,
}

impl<R: Read + Seek> ColumnChunkReader<R> {
    /// Binds a reader to one chunk of `column`, seeking `source` to the
    /// chunk's first page.
    pub fn new(
        source: R,
        column: ColumnDescriptor,
        chunk: ChunkMetaData,
        headers: Arc<dyn PageHeaderDecoder>,
        codecs: Arc<dyn CodecRegistry>,
    ) -> Result<ColumnChunkReader<R>> {
        if let Some(path) = &chunk.file_path {
            return Err(Error::metadata_mismatch(format!(
                "chunk data stored in another file: '{path}'"
            )));
        }
        if chunk.physical_type != column.physical_type {
            return Err(Error::metadata_mismatch(format!(
                "column '{}' is {} but chunk holds {}",
                column.path, column.physical_type, chunk.physical_type
            )));
        }

        let start = chunk.dictionary_page_offset.unwrap_or(chunk.data_page_offset);
        if start < 0 {
            return Err(Error::invalid_size("chunk page offset", start));
        }
        let reader = OffsetReader::new_at(source, start as u64)
            .map_err(|e| Error::io("chunk start seek", e))?;

        // Definition levels are stored only when the column can actually be
        // undefined; repetition levels only when it can repeat. The omitted
        // streams are synthesized as constants.
        let nested = column.is_nested();
        let d_factory = if !nested && column.repetition == Repetition::Required {
            LevelFactory::Constant {
                value: column.max_def_level,
                max: column.max_def_level,
            }
        } else {
            LevelFactory::Hybrid {
                bit_width: level_bit_width(column.max_def_level),
                max: column.max_def_level,
            }
        };
        let r_factory = if !nested && column.repetition != Repetition::Repeated {
            LevelFactory::Constant {
                value: 0,
                max: column.max_rep_level,
            }
        } else {
            LevelFactory::Hybrid {
                bit_width: level_bit_width(column.max_rep_level),
                max: column.max_rep_level,
            }
        };

        Ok(ColumnChunkReader {
            column,
            chunk,
            reader,
            headers,
            codecs,
            d_factory,
            r_factory,
            dictionary: None,
            active_page: None,
        })
    }

    /// Reads the next data page, materializing the dictionary page on the
    /// way if the chunk has one. Returns `None` once the chunk's compressed
    /// extent is exhausted.
    fn read_page(&mut self) -> Result<Option<DataPage>> {
        loop {
            if self.chunk.total_compressed_size - self.reader.count() <= 0 {
                return Ok(None);
            }
            let header = self.headers.read_header(&mut self.reader)?;
            match &header.kind {
                PageKind::Dictionary(dict_header) => {
                    if self.dictionary.is_some() {
                        return Err(Error::duplicate_dictionary());
                    }
                    let page = DictionaryPage::read(
                        &mut self.reader,
                        &header,
                        dict_header,
                        &self.column,
                        self.chunk.codec,
                        self.codecs.as_ref(),
                    )?;
                    self.dictionary = Some(page.values().clone());

                    // A dictionary page need not sit flush against the data
                    // pages; realign to the recorded data-page offset when it
                    // does not.
                    if let Some(dict_offset) = self.chunk.dictionary_page_offset {
                        if dict_offset != self.reader.position() {
                            self.reader
                                .seek_to(self.chunk.data_page_offset as u64)
                                .map_err(|e| Error::io("data page seek", e))?;
                        }
                    }
                }
                PageKind::DataV1(data_header) => {
                    let page = DataPage::read_v1(
                        &mut self.reader,
                        &header,
                        data_header,
                        &self.column,
                        self.chunk.codec,
                        self.codecs.as_ref(),
                        self.d_factory,
                        self.r_factory,
                        self.dictionary.as_ref(),
                    )?;
                    return Ok(Some(page));
                }
                PageKind::DataV2(data_header) => {
                    let page = DataPage::read_v2(
                        &mut self.reader,
                        &header,
                        data_header,
                        &self.column,
                        self.chunk.codec,
                        self.codecs.as_ref(),
                        self.d_factory,
                        self.r_factory,
                        self.dictionary.as_ref(),
                    )?;
                    return Ok(Some(page));
                }
                other => {
                    return Err(Error::invalid_format(
                        "page header",
                        format!(
                            "expected DATA_PAGE, DATA_PAGE_V2 or DICTIONARY_PAGE, found {}",
                            other.name()
                        ),
                    ))
                }
            }
        }
    }

    /// Emits the next batch of up to `out.len()` positions; see
    /// [`DataPage::read_values`] for the slot convention. An empty batch
    /// means end of chunk and repeats on every further call.
    pub fn read_values(&mut self, out: &mut [Value]) -> Result<ReadBatch> {
        if out.is_empty() {
            return Ok(ReadBatch::empty());
        }
        loop {
            if let Some(page) = self.active_page.as_mut() {
                let batch = page.read_values(out)?;
                if !batch.is_empty() {
                    return Ok(batch);
                }
                self.active_page = None;
            }
            match self.read_page()? {
                Some(page) => self.active_page = Some(page),
                None => return Ok(ReadBatch::empty()),
            }
        }
    }

    /// The dictionary materialized from this chunk, if one has been read.
    pub fn dictionary(&self) -> Option<&Arc<[Value]>> {
        self.dictionary.as_ref()
    }

    pub fn column(&self) -> &ColumnDescriptor {
        &self.column
    }
}
