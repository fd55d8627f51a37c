// ABOUTME: Dialect-specific text layout of a dump document
// ABOUTME: Writes the banner, one block per table and the completion footer

use crate::dump::document::DumpDocument;
use std::io::{self, Write};

const MYSQL_PREAMBLE: &str = "\
/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;
/*!40101 SET @OLD_CHARACTER_SET_RESULTS=@@CHARACTER_SET_RESULTS */;
/*!40101 SET @OLD_COLLATION_CONNECTION=@@COLLATION_CONNECTION */;
/*!40101 SET NAMES utf8 */;
/*!40103 SET @OLD_TIME_ZONE=@@TIME_ZONE */;
/*!40103 SET TIME_ZONE='+00:00' */;
/*!40014 SET @OLD_UNIQUE_CHECKS=@@UNIQUE_CHECKS, UNIQUE_CHECKS=0 */;
/*!40014 SET @OLD_FOREIGN_KEY_CHECKS=@@FOREIGN_KEY_CHECKS, FOREIGN_KEY_CHECKS=0 */;
/*!40101 SET @OLD_SQL_MODE=@@SQL_MODE, SQL_MODE='NO_AUTO_VALUE_ON_ZERO' */;
/*!40111 SET @OLD_SQL_NOTES=@@SQL_NOTES, SQL_NOTES=0 */;
";

fn write_banner(out: &mut dyn Write, doc: &DumpDocument) -> io::Result<()> {
    writeln!(out, "-- SQL Dump {}", doc.format_version)?;
    writeln!(out, "--")?;
    writeln!(out, "-- ------------------------------------------------------")?;
    writeln!(out, "-- Server version\t{}", doc.server_version)?;
    writeln!(out)
}

fn write_footer(out: &mut dyn Write, doc: &DumpDocument) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "-- Dump completed on {}", doc.completed_at)
}

/// MySQL-family layout: session preamble, then per table a DROP, the
/// charset-guarded DDL and a LOCK TABLES / DISABLE KEYS bracketed data section.
pub fn render_mysql(doc: &DumpDocument, out: &mut dyn Write) -> io::Result<()> {
    write_banner(out, doc)?;
    out.write_all(MYSQL_PREAMBLE.as_bytes())?;
    writeln!(out)?;
    writeln!(out)?;

    for table in &doc.tables {
        let name = &table.name;
        writeln!(out)?;
        writeln!(out, "--")?;
        writeln!(out, "-- Table structure for table {}", name)?;
        writeln!(out, "--")?;
        writeln!(out)?;
        writeln!(out, "DROP TABLE IF EXISTS {};", name)?;
        writeln!(out, "/*!40101 SET @saved_cs_client     = @@character_set_client */;")?;
        writeln!(out, "/*!40101 SET character_set_client = utf8 */;")?;
        writeln!(out, "{};", table.statement())?;
        writeln!(out, "/*!40101 SET character_set_client = @saved_cs_client */;")?;
        writeln!(out, "--")?;
        writeln!(out, "-- Dumping data for table {}", name)?;
        writeln!(out, "--")?;
        writeln!(out)?;
        writeln!(out, "LOCK TABLES {} WRITE;", name)?;
        writeln!(out, "/*!40000 ALTER TABLE {} DISABLE KEYS */;", name)?;
        if table.has_rows() {
            writeln!(out)?;
            writeln!(out, "INSERT INTO {} VALUES {};", name, table.values)?;
        }
        writeln!(out)?;
        writeln!(out, "/*!40000 ALTER TABLE {} ENABLE KEYS */;", name)?;
        writeln!(out, "UNLOCK TABLES;")?;
    }

    write_footer(out, doc)
}

/// PostgreSQL-family layout: no session preamble; sequences precede the DDL.
pub fn render_postgres(doc: &DumpDocument, out: &mut dyn Write) -> io::Result<()> {
    write_banner(out, doc)?;

    if !doc.sequences.is_empty() {
        writeln!(out, "--")?;
        writeln!(out, "-- Sequences")?;
        writeln!(out, "--")?;
        writeln!(out)?;
        for sequence in &doc.sequences {
            write!(out, "{}", sequence)?;
        }
    }

    for table in &doc.tables {
        let name = &table.name;
        writeln!(out)?;
        writeln!(out, "--")?;
        writeln!(out, "-- Table structure for table {}", name)?;
        writeln!(out, "--")?;
        writeln!(out)?;
        writeln!(out, "DROP TABLE IF EXISTS {};", name)?;
        for sequence in &table.sequences {
            write!(out, "{}", sequence)?;
        }
        writeln!(out, "{};", table.statement())?;
        writeln!(out, "--")?;
        writeln!(out, "-- Dumping data for table {}", name)?;
        writeln!(out, "--")?;
        if table.has_rows() {
            writeln!(out)?;
            writeln!(out, "INSERT INTO {} VALUES {};", name, table.values)?;
        }
    }

    write_footer(out, doc)
}
