//! Built-in RedSync language reference (F12 / `:help`)

pub const TITLE: &str = "RedSync - Referencia del lenguaje";

pub const REFERENCE: &str = "\
RedSync - Referencia del lenguaje
=================================

1. Variables
------------
  vn nombre = expresion      variable numerica
  vt nombre = \"texto\"        variable de texto
  nombre = valor             reasignacion, sin prefijo

  Operadores: + - * / % ** ( )   Unario: vn t = -5 + (-10)

2. Entrada y salida
-------------------
  mostrar(contenido)         imprime en la consola
  entrada(\"mensaje\")         pausa y lee un dato

3. Listas
---------
  ln nombre = [1, 2, 3]      lista numerica
  lt nombre = [\"a\", \"b\"]     lista de texto

  lista.agregar(valor)   lista.eliminar(indice)
  lista.ordenar()        lista.invertir()

4. Funciones
------------
  funcion calcular_iva(precio)
      vn impuesto = precio * 0.16
      retornar impuesto
  funcion!

  Todo bloque se cierra con su nombre seguido de '!'.

5. Control de flujo
-------------------
  si (x > 10) ... sino ... si!        condicional, 'sino' opcional
  mientras (vida > 0) ... mientras!   repite mientras se cumpla
  cada (p en lista) ... cada!         recorre una lista (ln o lt)
  contar (i de 1 a 10) ... contar!    repite un numero fijo de veces

  Logicos: Y (&&)  O (||)  NO (!)  ==  !=

6. Modulos
----------
  importar(\"modulo\")

  web.leer(\"URL\", \"CLAVE\", \"VARIABLE\")
      Consulta la URL antes de ejecutar y busca CLAVE en el JSON
      recibido (busqueda en profundidad). Con CLAVE \"0\" guarda la
      respuesta completa. Si falla la red o no hay dato: NULL.

  archivos.crear(\"datos.json\")
  archivos.escribir(\"datos.json\", \"clave\", valor)
  archivos.leer(\"datos.json\", \"clave\", \"variable\")
  archivos.inspeccionar(\"datos.json\")

  tiempo.hora(\"var\", \"H\" | \"HM\" | \"\")
  tiempo.fecha(\"var\", \"D\" | \"DM\" | \"\")
  tiempo.año(\"var\")

  random.numero(\"var\", min, max)
  random.elegir(\"var\", \"lista\")

  sistema.esperar(ms)        pausa (1000 ms = 1 s)
  sistema.limpiar()          limpia la consola

Teclas: F2 nuevo  F3 guardar  F4 ejecutar  F12 ayuda
Ayuda: j/k o flechas para desplazar, q o Esc para cerrar.
";

/// Scroll state of the open reference overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HelpView {
    scroll: usize,
}

impl HelpView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines() -> impl Iterator<Item = &'static str> {
        REFERENCE.lines()
    }

    pub fn line_count() -> usize {
        REFERENCE.lines().count()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scroll down, keeping at least the last line on screen
    pub fn scroll_down(&mut self, rows: usize) {
        let max = Self::line_count().saturating_sub(1);
        self.scroll = (self.scroll + rows).min(max);
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }
}
