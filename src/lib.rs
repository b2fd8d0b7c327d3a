/*!
# Sheetpad

A browser-based spreadsheet editor backend, built in Rust.

## Overview

Sheetpad serves one in-memory spreadsheet document per process: a dense
grid of text cells plus an ordered list of per-cell comments. There is no
formula engine and no persistence; the server is a thin CRUD layer whose
one real obligation is keeping each cell's comment-presence flag in sync
with the live comment list under concurrent requests.

## Architecture

- **Frontend layer**: a static HTML/JS page (`static/index.html`) that
  renders the grid and comment sidebar and talks to the REST API.
- **Backend layer**: axum handlers over a lock-guarded document store.
  State is reset on restart by design.

## Modules

- **cell**: cell ids (`"<row>-<col>"` encoding, `A1`-style labels) and the
  `Cell` struct
- **document**: the `SheetDocument` model, comment bookkeeping and the
  comment/flag invariant
- **store**: the `SheetStore` shared-state wrapper and its error taxonomy
- **app**: routing, request handlers and the JSON response envelope

## REST API Endpoints

- `GET /sheet` / `POST /sheet` - fetch or wholesale-replace the document
- `GET /sheet/cell?id=` / `PUT /sheet/cell` - fetch or update one cell
- `GET /sheet/comment?cellId=` / `POST /sheet/comment` /
  `DELETE /sheet/comment?id=` - list, add or delete comments
*/

pub mod app;
pub mod cell;
pub mod document;
pub mod store;

pub use cell::{Cell, CellId};
pub use document::{Comment, SheetDocument};
pub use store::{SheetStore, StoreError};
