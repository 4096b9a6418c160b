pub const SHOCK_ENG_HELPER: &'static str = "
                                General remarks. \n
All quantities are given in SI units: temperatures in K, pressures in Pa, \n
times in seconds. Check the dimensions of the input values carefully! \n
1) A task file consists of headers - lines containing a single word - with \n
key: value pairs below them, always separated by a colon. A header groups a \n
logically related set of parameters. Values may be integers (100), floats \n
(13.054, 1e-4) or strings. \n
2) Headers and fields are either mandatory or optional. A missing mandatory \n
header or field aborts the task with an error message naming it. \n

                                Task file headers \n
mixture - mandatory header. Each field is a species name with its relative \n
mole amount, e.g. \n
        CH4: 0.05 \n
        O2: 0.10 \n
        AR: 0.85 \n
Amounts need not sum to one; they are normalized. Species names must be \n
present in the built-in thermodynamic table (AR, HE, N2, O2, H2, CO, CO2, \n
H2O, CH4). \n

initial_conditions - mandatory header. \n
        T1: %float% - fill temperature of the driven section, K. \n

targets - mandatory header; the desired state behind the reflected shock. \n
        T5: %float% - target temperature, K, must exceed T1; \n
        P5: %float% - target pressure, Pa. \n

driver - optional header. When present the required driver pressure P4 is \n
solved for as well. \n
        gas: %species% - driver gas name, e.g. HE; \n
        T4: %float% - driver temperature, K; \n
        area_ratio: %float% - driver to driven area ratio, >= 1. \n
";
